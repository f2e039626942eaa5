//=========================================================================
// Asset Manifest
//=========================================================================
//
// Explicit registry of `(owner, reference, kind)` triples.
//
// Each type that needs assets declares them as `static AssetRef`s and
// lists them through `DeclaresAssets`. Registering the type records the
// owner under its fully qualified type name, which is what namespace
// filtering in the scanner matches against.
//
//   static PLAYER: AssetRef = AssetRef::new("sprites/player.png", AssetKind::Texture);
//
//   impl DeclaresAssets for Player {
//       fn declared_assets() -> Vec<&'static AssetRef> { vec![&PLAYER] }
//   }
//
//   manifest.register::<Player>();
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::type_name;
use std::sync::OnceLock;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::AssetKind;

//=== AssetRef ============================================================

/// A resource reference attached to a type.
///
/// Holds the raw reference until discovery validates it, after which
/// [`path`](Self::path) returns the resolved on-disk path.
#[derive(Debug)]
pub struct AssetRef {
    reference: &'static str,
    kind: AssetKind,
    resolved: OnceLock<String>,
}

impl AssetRef {
    pub const fn new(reference: &'static str, kind: AssetKind) -> Self {
        Self {
            reference,
            kind,
            resolved: OnceLock::new(),
        }
    }

    pub fn reference(&self) -> &'static str {
        self.reference
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn resolved(&self) -> Option<&str> {
        self.resolved.get().map(String::as_str)
    }

    /// Resolved path once discovered, the raw reference before that.
    pub fn path(&self) -> &str {
        self.resolved().unwrap_or(self.reference)
    }

    pub(crate) fn resolve(&self, path: String) {
        if let Err(path) = self.resolved.set(path) {
            trace!(
                "Reference '{}' already resolved, ignoring '{}'",
                self.reference,
                path
            );
        }
    }
}

//=== DeclaresAssets ======================================================

/// Implemented by types that own resource references.
pub trait DeclaresAssets: 'static {
    fn declared_assets() -> Vec<&'static AssetRef>;
}

//=== AssetManifest =======================================================

/// One registered reference and the type that declared it.
#[derive(Debug, Clone, Copy)]
pub struct ManifestEntry {
    pub owner: &'static str,
    pub asset: &'static AssetRef,
}

/// Every declared resource reference, in registration order.
#[derive(Debug, Default)]
pub struct AssetManifest {
    entries: Vec<ManifestEntry>,
    owners: Vec<&'static str>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every asset `T` declares. Registering a type twice is a no-op.
    pub fn register<T: DeclaresAssets>(&mut self) -> &mut Self {
        self.register_table(type_name::<T>(), &T::declared_assets())
    }

    /// Records a hand-maintained table of references under `owner`.
    pub fn register_table(&mut self, owner: &'static str, assets: &[&'static AssetRef]) -> &mut Self {
        if self.owners.contains(&owner) {
            debug!("Asset owner '{}' already registered", owner);
            return self;
        }

        self.owners.push(owner);
        self.entries
            .extend(assets.iter().map(|&asset| ManifestEntry { owner, asset }));
        trace!("Registered {} assets for '{}'", assets.len(), owner);
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<T: DeclaresAssets>(mut self) -> Self {
        self.register::<T>();
        self
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn owners(&self) -> &[&'static str] {
        &self.owners
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose owner lives under `namespace` (`""` matches everything).
    pub fn in_namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a ManifestEntry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| owned_by_namespace(entry.owner, namespace))
    }
}

fn owned_by_namespace(owner: &str, namespace: &str) -> bool {
    if namespace.is_empty() || owner == namespace {
        return true;
    }

    owner
        .strip_prefix(namespace)
        .is_some_and(|rest| rest.starts_with("::"))
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod sprites {
        use super::super::*;

        pub static HERO: AssetRef = AssetRef::new("hero.png", AssetKind::Texture);
        pub static STEP: AssetRef = AssetRef::new("step.wav", AssetKind::Sound);

        pub struct Hero;

        impl DeclaresAssets for Hero {
            fn declared_assets() -> Vec<&'static AssetRef> {
                vec![&HERO, &STEP]
            }
        }
    }

    static THEME: AssetRef = AssetRef::new("theme.ogg", AssetKind::Music);

    struct Level;

    impl DeclaresAssets for Level {
        fn declared_assets() -> Vec<&'static AssetRef> {
            vec![&THEME]
        }
    }

    #[test]
    fn register_records_owner_type_name() {
        let manifest = AssetManifest::new().with::<sprites::Hero>().with::<Level>();

        assert_eq!(manifest.len(), 3);
        assert!(manifest.entries()[0].owner.ends_with("sprites::Hero"));
        assert_eq!(manifest.entries()[2].asset.reference(), "theme.ogg");
    }

    #[test]
    fn registering_twice_is_noop() {
        let mut manifest = AssetManifest::new();
        manifest.register::<Level>().register::<Level>();

        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.owners().len(), 1);
    }

    #[test]
    fn namespace_matches_on_path_boundary() {
        assert!(owned_by_namespace("game::actors::Hero", ""));
        assert!(owned_by_namespace("game::actors::Hero", "game::actors"));
        assert!(owned_by_namespace("game::actors", "game::actors"));
        assert!(!owned_by_namespace("game::actors_extra::Hero", "game::actors"));
        assert!(!owned_by_namespace("other::Hero", "game"));
    }

    #[test]
    fn table_registration_filters_by_namespace() {
        let mut manifest = AssetManifest::new();
        manifest
            .register_table("game::ui", &[&THEME])
            .register_table("tools::editor", &[&sprites::HERO]);

        let found: Vec<_> = manifest
            .in_namespace("game")
            .map(|entry| entry.asset.reference())
            .collect();
        assert_eq!(found, vec!["theme.ogg"]);
    }

    #[test]
    fn path_falls_back_to_reference_until_resolved() {
        static LOOSE: AssetRef = AssetRef::new("loose.png", AssetKind::Texture);

        assert_eq!(LOOSE.path(), "loose.png");
        LOOSE.resolve("/assets/loose.png".to_owned());
        LOOSE.resolve("/elsewhere/loose.png".to_owned());
        assert_eq!(LOOSE.path(), "/assets/loose.png");
    }
}
