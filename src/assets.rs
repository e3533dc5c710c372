//! Asset loading with procedural fallbacks
//!
//! Four assets are expected: the bike, two car sprites and the music track.
//! The host reports each completion or failure; a failed sprite is replaced
//! by a vector placeholder. After a grace period the set counts as loaded
//! whatever is still outstanding.

use glam::Vec2;

use crate::consts::ASSET_LOAD_TIMEOUT_MS;

/// Asset slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetId {
    Bike,
    Car1,
    Car2,
    Music,
}

impl AssetId {
    pub const ALL: [AssetId; 4] = [AssetId::Bike, AssetId::Car1, AssetId::Car2, AssetId::Music];

    /// File the host should fetch
    pub fn path(&self) -> &'static str {
        match self {
            AssetId::Bike => "bike.png",
            AssetId::Car1 => "car1.png",
            AssetId::Car2 => "car2.png",
            AssetId::Music => "bg.mp3",
        }
    }

    fn index(&self) -> usize {
        match self {
            AssetId::Bike => 0,
            AssetId::Car1 => 1,
            AssetId::Car2 => 2,
            AssetId::Music => 3,
        }
    }
}

/// RGBA, 0..1
pub type Color = [f32; 4];

fn rgb(hex: u32, alpha: f32) -> Color {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    [r, g, b, alpha]
}

/// A vector drawing primitive in sprite-local pixels
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteShape {
    Ellipse { center: Vec2, radii: Vec2, color: Color },
    Ring { center: Vec2, radius: f32, width: f32, color: Color },
    Polyline { points: Vec<Vec2>, width: f32, color: Color },
    Rect { min: Vec2, max: Vec2, color: Color },
    RoundedRect { min: Vec2, max: Vec2, radius: f32, color: Color },
}

/// Something drawable at an entity's rect
#[derive(Debug, Clone, PartialEq)]
pub enum Sprite {
    /// Decoded image held by the host
    Image { path: &'static str, size: Vec2 },
    /// Drawn from primitives, scaled from `size` to the entity rect
    Procedural { size: Vec2, shapes: Vec<SpriteShape> },
}

impl Sprite {
    pub fn size(&self) -> Vec2 {
        match self {
            Sprite::Image { size, .. } | Sprite::Procedural { size, .. } => *size,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Sprite::Procedural { .. })
    }
}

/// Builds the stand-in sprites
pub struct PlaceholderGenerator;

/// Canvas size of every placeholder
const PLACEHOLDER_SIZE: Vec2 = Vec2::new(64.0, 96.0);

impl PlaceholderGenerator {
    pub fn bike() -> Sprite {
        let mut shapes = vec![SpriteShape::Ellipse {
            center: Vec2::new(32.0, 88.0),
            radii: Vec2::new(18.0, 6.0),
            color: [0.0, 0.0, 0.0, 0.25],
        }];

        for x in [22.0, 42.0] {
            let center = Vec2::new(x, 78.0);
            shapes.push(SpriteShape::Ellipse {
                center,
                radii: Vec2::splat(10.0),
                color: rgb(0x111111, 1.0),
            });
            shapes.push(SpriteShape::Ring {
                center,
                radius: 6.0,
                width: 2.0,
                color: rgb(0x666666, 1.0),
            });
        }

        // Frame
        let frame = rgb(0xff7a18, 1.0);
        let hub = Vec2::new(30.0, 58.0);
        for points in [
            vec![Vec2::new(22.0, 78.0), hub, Vec2::new(42.0, 78.0)],
            vec![hub, Vec2::new(20.0, 60.0)],
            vec![hub, Vec2::new(38.0, 56.0)],
        ] {
            shapes.push(SpriteShape::Polyline {
                points,
                width: 5.0,
                color: frame,
            });
        }

        // Fork and handlebar
        let chrome = rgb(0xdddddd, 1.0);
        for points in [
            vec![Vec2::new(38.0, 56.0), Vec2::new(42.0, 68.0)],
            vec![Vec2::new(36.0, 52.0), Vec2::new(48.0, 50.0)],
        ] {
            shapes.push(SpriteShape::Polyline {
                points,
                width: 3.0,
                color: chrome,
            });
        }

        // Rider
        shapes.push(SpriteShape::Ellipse {
            center: Vec2::new(28.0, 38.0),
            radii: Vec2::splat(8.0),
            color: rgb(0x222222, 1.0),
        });
        shapes.push(SpriteShape::Rect {
            min: Vec2::new(22.0, 44.0),
            max: Vec2::new(38.0, 58.0),
            color: rgb(0x4aa3ff, 1.0),
        });
        shapes.push(SpriteShape::Rect {
            min: Vec2::new(24.0, 56.0),
            max: Vec2::new(34.0, 72.0),
            color: rgb(0x222222, 1.0),
        });

        // Headlight glow
        shapes.push(SpriteShape::Ellipse {
            center: Vec2::new(48.0, 60.0),
            radii: Vec2::splat(18.0),
            color: [1.0, 1.0, 0.78, 0.3],
        });

        Sprite::Procedural {
            size: PLACEHOLDER_SIZE,
            shapes,
        }
    }

    /// Car placeholder; `variant` 0 is red, anything else blue
    pub fn car(variant: usize) -> Sprite {
        let body = if variant == 0 { 0xff3b3b } else { 0x3b78ff };
        let mut shapes = vec![
            SpriteShape::Ellipse {
                center: Vec2::new(32.0, 88.0),
                radii: Vec2::new(20.0, 6.0),
                color: [0.0, 0.0, 0.0, 0.22],
            },
            SpriteShape::RoundedRect {
                min: Vec2::new(14.0, 18.0),
                max: Vec2::new(50.0, 78.0),
                radius: 10.0,
                color: rgb(body, 1.0),
            },
        ];

        let glass = [0.51, 0.86, 1.0, 0.95];
        for y in [26.0, 50.0] {
            shapes.push(SpriteShape::Rect {
                min: Vec2::new(20.0, y),
                max: Vec2::new(44.0, y + 18.0),
                color: glass,
            });
        }

        let tyre = rgb(0x111111, 1.0);
        for (x, y) in [(12.0, 30.0), (46.0, 30.0), (12.0, 58.0), (46.0, 58.0)] {
            shapes.push(SpriteShape::Rect {
                min: Vec2::new(x, y),
                max: Vec2::new(x + 6.0, y + 14.0),
                color: tyre,
            });
        }

        let lamp = [1.0, 1.0, 0.86, 0.9];
        for x in [16.0, 40.0] {
            shapes.push(SpriteShape::Rect {
                min: Vec2::new(x, 18.0),
                max: Vec2::new(x + 8.0, 24.0),
                color: lamp,
            });
        }

        Sprite::Procedural {
            size: PLACEHOLDER_SIZE,
            shapes,
        }
    }
}

/// Per-slot progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Pending,
    Ready,
    Failed,
}

/// Tracks loading of the four assets
#[derive(Debug, Clone)]
pub struct AssetLoader {
    slots: [SlotState; 4],
    bike: Option<Sprite>,
    cars: [Option<Sprite>; 2],
    started_ms: Option<f64>,
    loaded: bool,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader {
    pub fn new() -> Self {
        Self {
            slots: [SlotState::Pending; 4],
            bike: None,
            cars: [None, None],
            started_ms: None,
            loaded: false,
        }
    }

    /// Everything replaced by placeholders up front (headless hosts)
    pub fn placeholders() -> Self {
        let mut loader = Self::new();
        for id in AssetId::ALL {
            loader.fail(id);
        }
        loader
    }

    /// Start the grace timer
    pub fn begin(&mut self, now_ms: f64) {
        self.started_ms.get_or_insert(now_ms);
        log::info!("loading {} assets", AssetId::ALL.len());
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of assets that reported back, either way
    pub fn settled(&self) -> usize {
        self.slots.iter().filter(|s| **s != SlotState::Pending).count()
    }

    /// An image decoded successfully
    pub fn image_ready(&mut self, id: AssetId, size: Vec2) {
        if self.slots[id.index()] != SlotState::Pending {
            log::debug!("late image for {} ignored", id.path());
            return;
        }
        let sprite = Sprite::Image {
            path: id.path(),
            size,
        };
        match id {
            AssetId::Bike => self.bike = Some(sprite),
            AssetId::Car1 => self.cars[0] = Some(sprite),
            AssetId::Car2 => self.cars[1] = Some(sprite),
            AssetId::Music => {
                log::debug!("ignoring image completion for the music slot");
                return;
            }
        }
        self.settle(id, SlotState::Ready);
    }

    pub fn music_ready(&mut self) {
        self.settle(AssetId::Music, SlotState::Ready);
    }

    /// An asset failed; sprites fall back to placeholders, music to silence
    pub fn fail(&mut self, id: AssetId) {
        match id {
            AssetId::Bike => {
                log::info!("{} not found, using placeholder", id.path());
                self.bike = Some(PlaceholderGenerator::bike());
            }
            AssetId::Car1 | AssetId::Car2 => {
                log::info!("{} not found, using placeholder", id.path());
                let variant = id.index() - 1;
                self.cars[variant] = Some(PlaceholderGenerator::car(variant));
            }
            AssetId::Music => log::info!("{} not found, continuing without music", id.path()),
        }
        self.settle(id, SlotState::Failed);
    }

    fn settle(&mut self, id: AssetId, state: SlotState) {
        let slot = &mut self.slots[id.index()];
        if *slot != SlotState::Pending {
            return;
        }
        *slot = state;
        log::info!("asset loaded: {}/{}", self.settled(), AssetId::ALL.len());
        if self.settled() == AssetId::ALL.len() {
            self.loaded = true;
        }
    }

    /// Force loaded once the grace period has passed. Returns `is_loaded`.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        let expired = self
            .started_ms
            .is_some_and(|started| now_ms - started >= ASSET_LOAD_TIMEOUT_MS);
        if !self.loaded && expired {
            log::warn!("asset loading timed out after {ASSET_LOAD_TIMEOUT_MS} ms");
            self.loaded = true;
        }
        self.loaded
    }

    pub fn music_available(&self) -> bool {
        self.slots[AssetId::Music.index()] == SlotState::Ready
    }

    /// Bike sprite, placeholder if it never arrived
    pub fn bike_sprite(&self) -> Sprite {
        self.bike.clone().unwrap_or_else(PlaceholderGenerator::bike)
    }

    /// Car sprites in variant order, placeholders for the missing ones
    pub fn car_sprites(&self) -> Vec<Sprite> {
        self.cars
            .iter()
            .enumerate()
            .map(|(i, car)| car.clone().unwrap_or_else(|| PlaceholderGenerator::car(i)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loaded_after_all_four_report() {
        let mut loader = AssetLoader::new();
        loader.begin(0.0);
        loader.image_ready(AssetId::Bike, Vec2::new(64.0, 96.0));
        loader.fail(AssetId::Car1);
        loader.image_ready(AssetId::Car2, Vec2::new(64.0, 96.0));
        assert!(!loader.is_loaded());
        loader.music_ready();
        assert!(loader.is_loaded());
        assert!(loader.music_available());

        let cars = loader.car_sprites();
        assert!(cars[0].is_placeholder());
        assert!(!cars[1].is_placeholder());
        assert!(!loader.bike_sprite().is_placeholder());
    }

    #[test]
    fn test_duplicate_reports_count_once() {
        let mut loader = AssetLoader::new();
        loader.music_ready();
        loader.music_ready();
        loader.fail(AssetId::Music);
        assert_eq!(loader.settled(), 1);
        assert!(loader.music_available());
    }

    #[test]
    fn test_late_image_keeps_placeholder() {
        let mut loader = AssetLoader::new();
        loader.fail(AssetId::Car1);
        loader.image_ready(AssetId::Car1, Vec2::new(64.0, 96.0));
        assert!(loader.car_sprites()[0].is_placeholder());
        assert_eq!(loader.settled(), 1);
    }

    #[test]
    fn test_timeout_forces_loaded() {
        let mut loader = AssetLoader::new();
        loader.begin(1000.0);
        loader.image_ready(AssetId::Bike, Vec2::new(64.0, 96.0));
        assert!(!loader.poll(3999.0));
        assert!(loader.poll(4000.0));
        assert!(!loader.music_available());
        // Car sprites that never arrived still draw
        assert!(loader.car_sprites().iter().all(Sprite::is_placeholder));
    }

    #[test]
    fn test_no_timeout_before_begin() {
        let mut loader = AssetLoader::new();
        assert!(!loader.poll(1.0e9));
    }

    #[test]
    fn test_placeholder_shapes() {
        let Sprite::Procedural { size, shapes } = PlaceholderGenerator::car(1) else {
            panic!("expected a procedural sprite");
        };
        assert_eq!(size, Vec2::new(64.0, 96.0));
        assert!(shapes.contains(&SpriteShape::RoundedRect {
            min: Vec2::new(14.0, 18.0),
            max: Vec2::new(50.0, 78.0),
            radius: 10.0,
            color: rgb(0x3b78ff, 1.0),
        }));
        assert!(AssetLoader::placeholders().is_loaded());
    }
}
