//! Scene descriptors supplied by the content layer, and the catalog of known scenes.

use crate::config::GalleryConfig;
use engine_core::{CameraPose, Vec3};
use physics::BoxCollider;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Scene identifier as written in scene files.
pub type SceneId = String;

/// Content-layer id of an exhibit, stable across scenes that show the same piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExhibitId(pub u32);

impl fmt::Display for ExhibitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("could not read scene file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse scene {origin}")]
    Parse {
        origin: String,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("scene '{scene}' lists exhibit {id} more than once")]
    DuplicateExhibit { scene: SceneId, id: ExhibitId },
    #[error("scene '{scene}' collider {index} has a non-positive or non-finite size")]
    InvalidCollider { scene: SceneId, index: usize },
    #[error("scene '{scene}' exhibit {exhibit} has an invalid interaction radius or gaze tolerance")]
    InvalidExhibit { scene: SceneId, exhibit: ExhibitId },
    #[error("scene '{0}' is defined more than once")]
    DuplicateScene(SceneId),
    #[error("no scene with id '{0}'")]
    UnknownScene(SceneId),
    #[error("scene '{scene}' exhibit {exhibit} opens unknown scene '{target}'")]
    UnknownLink {
        scene: SceneId,
        exhibit: ExhibitId,
        target: SceneId,
    },
}

/// Which gameplay a scene runs. Both share the navigation core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SceneKind {
    #[default]
    Exhibition,
    Inventory,
}

/// Per-scene overrides of the global config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub move_speed: Option<f32>,
    pub interaction_distance: Option<f32>,
    pub show_instructions: bool,
}

/// A blocking box, as center and full edge lengths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColliderDef {
    pub center: [f32; 3],
    pub size: [f32; 3],
}

impl ColliderDef {
    pub fn to_box(&self) -> BoxCollider {
        BoxCollider::from_size(Vec3::from(self.center), Vec3::from(self.size))
    }
}

fn default_true() -> bool {
    true
}

/// One interactable exhibit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExhibitDef {
    pub id: ExhibitId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub position: [f32; 3],
    /// Whether selecting it opens a close-up inspection.
    #[serde(default = "default_true")]
    pub inspectable: bool,
    /// For non-inspectable exhibits: the scene a click should open.
    #[serde(default)]
    pub opens_scene: Option<SceneId>,
    #[serde(default)]
    pub interaction_radius: Option<f32>,
    #[serde(default)]
    pub gaze_tolerance: Option<f32>,
}

/// Immutable description of one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    pub id: SceneId,
    pub name: String,
    #[serde(default)]
    pub kind: SceneKind,
    pub camera_start: [f32; 3],
    #[serde(default)]
    pub camera_yaw: f32,
    #[serde(default)]
    pub settings: SceneSettings,
    #[serde(default)]
    pub colliders: Vec<ColliderDef>,
    #[serde(default)]
    pub exhibits: Vec<ExhibitDef>,
}

impl SceneDescriptor {
    /// Parse a descriptor from RON text. `origin` names the source in errors.
    pub fn from_ron_str(text: &str, origin: &str) -> Result<Self, SceneError> {
        let scene: SceneDescriptor = ron::from_str(text).map_err(|source| SceneError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        scene.validate()?;
        Ok(scene)
    }

    /// Read and parse a descriptor file.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text, &path.display().to_string())
    }

    /// Check the descriptor on its own (links are checked by the catalog).
    pub fn validate(&self) -> Result<(), SceneError> {
        for (index, collider) in self.colliders.iter().enumerate() {
            if !collider.to_box().is_valid() {
                return Err(SceneError::InvalidCollider {
                    scene: self.id.clone(),
                    index,
                });
            }
        }
        let mut seen = HashSet::new();
        for exhibit in &self.exhibits {
            if !seen.insert(exhibit.id) {
                return Err(SceneError::DuplicateExhibit {
                    scene: self.id.clone(),
                    id: exhibit.id,
                });
            }
            let radius_ok = exhibit.interaction_radius.map_or(true, |r| r.is_finite() && r > 0.0);
            let gaze_ok = exhibit.gaze_tolerance.map_or(true, |g| g.is_finite() && g > 0.0);
            if !radius_ok || !gaze_ok {
                return Err(SceneError::InvalidExhibit {
                    scene: self.id.clone(),
                    exhibit: exhibit.id,
                });
            }
        }
        Ok(())
    }

    pub fn collider_boxes(&self) -> Vec<BoxCollider> {
        self.colliders.iter().map(ColliderDef::to_box).collect()
    }

    /// Camera pose on first entry.
    pub fn start_pose(&self) -> CameraPose {
        CameraPose::new(Vec3::from(self.camera_start), self.camera_yaw, 0.0)
    }

    pub fn exhibit(&self, id: ExhibitId) -> Option<&ExhibitDef> {
        self.exhibits.iter().find(|e| e.id == id)
    }

    /// Walking speed for this scene.
    pub fn move_speed(&self, config: &GalleryConfig) -> f32 {
        self.settings.move_speed.unwrap_or(config.locomotion.max_speed)
    }

    /// Default reach for exhibits in this scene.
    pub fn interaction_distance(&self, config: &GalleryConfig) -> f32 {
        self.settings
            .interaction_distance
            .unwrap_or(config.interaction.interaction_radius)
    }
}

/// All scenes the viewer can switch between, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct SceneCatalog {
    scenes: BTreeMap<SceneId, SceneDescriptor>,
}

const BUILTIN_SCENES: [(&str, &str); 2] = [
    ("main_gallery.ron", include_str!("../scenes/main_gallery.ron")),
    ("inventory_room.ron", include_str!("../scenes/inventory_room.ron")),
];

impl SceneCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scenes bundled with the binary.
    pub fn builtin() -> Result<Self, SceneError> {
        let mut catalog = Self::new();
        for (origin, text) in BUILTIN_SCENES {
            catalog.insert(SceneDescriptor::from_ron_str(text, origin)?)?;
        }
        catalog.validate_links()?;
        Ok(catalog)
    }

    /// Load every `*.ron` file in a directory.
    pub fn load_dir(dir: &Path) -> Result<Self, SceneError> {
        let io_err = |source| SceneError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(io_err)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "ron"))
            .collect();
        paths.sort();

        let mut catalog = Self::new();
        for path in paths {
            catalog.insert(SceneDescriptor::load(&path)?)?;
        }
        catalog.validate_links()?;
        log::info!("Loaded {} scene(s) from {:?}", catalog.len(), dir);
        Ok(catalog)
    }

    pub fn insert(&mut self, scene: SceneDescriptor) -> Result<(), SceneError> {
        if self.scenes.contains_key(&scene.id) {
            return Err(SceneError::DuplicateScene(scene.id));
        }
        self.scenes.insert(scene.id.clone(), scene);
        Ok(())
    }

    /// Every `opens_scene` link must name a scene in the catalog.
    pub fn validate_links(&self) -> Result<(), SceneError> {
        for scene in self.scenes.values() {
            for exhibit in &scene.exhibits {
                if let Some(target) = &exhibit.opens_scene {
                    if !self.scenes.contains_key(target) {
                        return Err(SceneError::UnknownLink {
                            scene: scene.id.clone(),
                            exhibit: exhibit.id,
                            target: target.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&SceneDescriptor> {
        self.scenes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.scenes.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_ROOM: &str = r#"(
        id: "small",
        name: "Small Room",
        camera_start: (0.0, 1.7, 4.0),
        colliders: [(center: (0.0, 2.5, -5.0), size: (10.0, 5.0, 0.2))],
        exhibits: [
            (id: 1, title: "Vase", position: (0.0, 1.2, 0.0)),
            (id: 2, title: "Door", position: (3.0, 1.2, 0.0), inspectable: false, opens_scene: Some("small")),
        ],
    )"#;

    #[test]
    fn parses_with_defaults() {
        let scene = SceneDescriptor::from_ron_str(SMALL_ROOM, "inline").expect("valid scene");
        assert_eq!(scene.kind, SceneKind::Exhibition);
        assert!(scene.exhibits[0].inspectable);
        assert!(!scene.exhibits[1].inspectable);
        assert_eq!(scene.start_pose().position, Vec3::new(0.0, 1.7, 4.0));
        assert_eq!(scene.collider_boxes()[0].half_extents, Vec3::new(5.0, 2.5, 0.1));
    }

    #[test]
    fn duplicate_exhibits_are_rejected() {
        let text = SMALL_ROOM.replace("id: 2,", "id: 1,");
        let err = SceneDescriptor::from_ron_str(&text, "inline").unwrap_err();
        assert!(matches!(err, SceneError::DuplicateExhibit { id: ExhibitId(1), .. }));
    }

    #[test]
    fn flat_colliders_are_rejected() {
        let text = SMALL_ROOM.replace("size: (10.0, 5.0, 0.2)", "size: (10.0, 0.0, 0.2)");
        let err = SceneDescriptor::from_ron_str(&text, "inline").unwrap_err();
        assert!(matches!(err, SceneError::InvalidCollider { index: 0, .. }));
    }

    #[test]
    fn parse_errors_name_their_origin() {
        let err = SceneDescriptor::from_ron_str("(id: ", "broken.ron").unwrap_err();
        assert!(err.to_string().contains("broken.ron"));
    }

    #[test]
    fn catalog_rejects_dangling_links() {
        let text = SMALL_ROOM.replace("Some(\"small\")", "Some(\"nowhere\")");
        let mut catalog = SceneCatalog::new();
        catalog
            .insert(SceneDescriptor::from_ron_str(&text, "inline").expect("valid on its own"))
            .expect("first insert");
        assert!(matches!(
            catalog.validate_links(),
            Err(SceneError::UnknownLink { .. })
        ));
    }

    #[test]
    fn builtin_catalog_is_consistent() {
        let catalog = SceneCatalog::builtin().expect("bundled scenes are valid");
        let main = catalog.get("itamar-main").expect("main gallery");
        assert_eq!(main.start_pose().position, Vec3::new(0.0, 1.7, 11.0));
        assert_eq!(main.move_speed(&GalleryConfig::default()), 3.5);
        let inventory = catalog.get("inventory-room").expect("inventory");
        assert_eq!(inventory.kind, SceneKind::Inventory);
        assert!(main.exhibits.iter().any(|e| e.opens_scene.as_deref() == Some("inventory-room")));
    }
}
