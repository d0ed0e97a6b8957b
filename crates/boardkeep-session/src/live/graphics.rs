//! Display state: colors, visibility and the board-to-screen transform.

use boardkeep_persistence::Point;
use rkyv::{Archive, Deserialize, Serialize};

/// Number of object types with their own visibility intensity.
pub const OBJECT_TYPE_COUNT: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Item colors (one per object type) and the remaining display colors.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct ColorTables {
    pub items: Vec<Rgb>,
    pub other: Vec<Rgb>,
}

impl Default for ColorTables {
    fn default() -> Self {
        Self {
            items: vec![
                Rgb::new(255, 0, 0),
                Rgb::new(200, 200, 0),
                Rgb::new(150, 50, 0),
                Rgb::new(0, 200, 60),
                Rgb::new(150, 150, 150),
                Rgb::new(100, 100, 200),
                Rgb::new(80, 80, 80),
                Rgb::new(255, 255, 255),
                Rgb::new(0, 180, 180),
            ],
            other: vec![
                Rgb::new(70, 70, 70),
                Rgb::new(255, 255, 255),
                Rgb::new(255, 255, 0),
                Rgb::new(0, 0, 0),
            ],
        }
    }
}

/// Mapping between board and screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct CoordinateTransform {
    /// Screen pixels per board unit.
    pub scale: f64,

    /// Screen position of the board origin.
    pub origin: Point,

    /// Size of the board panel in pixels.
    pub panel_width: i32,
    pub panel_height: i32,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            origin: Point::new(0, 0),
            panel_width: 1000,
            panel_height: 800,
        }
    }
}

/// Everything that controls how the board is drawn.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct GraphicsContext {
    pub colors: ColorTables,

    /// Visibility intensity per object type, 0.0 (hidden) to 1.0.
    pub object_intensities: Vec<f32>,

    /// Visibility intensity per layer.
    pub layer_visibility: Vec<f32>,

    pub transform: CoordinateTransform,
}

impl GraphicsContext {
    /// Defaults for a board with `layer_count` layers.
    pub fn for_layers(layer_count: usize) -> Self {
        Self {
            colors: ColorTables::default(),
            object_intensities: vec![1.0; OBJECT_TYPE_COUNT],
            layer_visibility: vec![1.0; layer_count],
            transform: CoordinateTransform::default(),
        }
    }

    pub fn object_type_count(&self) -> usize {
        self.object_intensities.len()
    }
}
