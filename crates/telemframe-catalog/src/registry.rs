use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use telemframe_frame::{Descriptor, DescriptorLookup};
use telemframe_messages::MessageKind;

use crate::config::CatalogConfig;
use crate::definition::Definition;
use crate::error::{CatalogError, Result};

/// A registered message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub descriptor: Descriptor,
}

/// Tag-keyed table of framing descriptors.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: BTreeMap<u8, Entry>,
    config: CatalogConfig,
}

impl Catalog {
    /// Create an empty catalogue with default config.
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    /// Create an empty catalogue with explicit config.
    pub fn with_config(config: CatalogConfig) -> Self {
        Self {
            entries: BTreeMap::new(),
            config,
        }
    }

    /// Catalogue of the built-in message set.
    pub fn builtin() -> Self {
        Self::builtin_with_config(CatalogConfig::default())
    }

    /// Built-in message set with explicit config, e.g. to allow a
    /// definition file to override built-in types.
    pub fn builtin_with_config(config: CatalogConfig) -> Self {
        let mut catalog = Self::with_config(config);
        for kind in MessageKind::ALL {
            catalog.entries.insert(
                kind.type_tag(),
                Entry {
                    name: kind.name().to_string(),
                    descriptor: kind.descriptor(),
                },
            );
        }
        catalog
    }

    /// Register a validated descriptor under `name`.
    pub fn register(&mut self, name: impl Into<String>, descriptor: Descriptor) -> Result<()> {
        let name = name.into();
        descriptor.validate()?;

        if let Some(existing) = self.entries.get(&descriptor.type_tag) {
            if !self.config.allow_overrides {
                return Err(CatalogError::DuplicateType {
                    type_tag: descriptor.type_tag,
                    existing: existing.name.clone(),
                });
            }
            tracing::debug!(
                type_tag = descriptor.type_tag,
                previous = %existing.name,
                name = %name,
                "overriding message type"
            );
        }

        self.entries
            .insert(descriptor.type_tag, Entry { name, descriptor });
        Ok(())
    }

    /// Register one parsed definition.
    pub fn register_definition(&mut self, definition: &Definition) -> Result<()> {
        let descriptor = definition.to_descriptor()?;
        self.register(definition.name.clone(), descriptor)
    }

    /// Parse a definition array into an empty catalogue.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with_config(json, CatalogConfig::default())
    }

    pub fn from_json_with_config(json: &str, config: CatalogConfig) -> Result<Self> {
        let mut catalog = Self::with_config(config);
        catalog.load_json(json)?;
        Ok(catalog)
    }

    /// Parse a definition array and add it to this catalogue.
    ///
    /// Nothing is registered if any definition fails.
    pub fn load_json(&mut self, json: &str) -> Result<usize> {
        let definitions: Vec<Definition> = serde_json::from_str(json)?;
        if definitions.len() > self.config.max_definitions {
            return Err(CatalogError::LoadFailed(format!(
                "definition count exceeds configured max ({}): {}",
                self.config.max_definitions,
                definitions.len()
            )));
        }

        let mut staged = self.clone();
        for definition in &definitions {
            staged.register_definition(definition)?;
        }
        self.entries = staged.entries;

        tracing::info!(count = definitions.len(), "loaded message definitions");
        Ok(definitions.len())
    }

    /// Load a definition file into an empty catalogue.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_file_with_config(path, CatalogConfig::default())
    }

    pub fn from_file_with_config(path: &Path, config: CatalogConfig) -> Result<Self> {
        let mut catalog = Self::with_config(config);
        catalog.load_file(path)?;
        Ok(catalog)
    }

    /// Load a definition file into this catalogue.
    ///
    /// Symlinks are refused and reads are bounded by
    /// `config.max_file_size`.
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let content = read_bounded(path, self.config.max_file_size)?;
        self.load_json(&content)
    }

    /// Descriptor registered for `type_tag`.
    pub fn get(&self, type_tag: u8) -> Option<&Entry> {
        self.entries.get(&type_tag)
    }

    /// Find an entry by name, ignoring ASCII case.
    pub fn find_by_name(&self, name: &str) -> Option<&Entry> {
        self.entries
            .values()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    /// Registered type tags in ascending order.
    pub fn tags(&self) -> Vec<u8> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending tag order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Fully spelled-out definitions, suitable for writing back to a file.
    pub fn definitions(&self) -> Vec<Definition> {
        self.iter()
            .map(|entry| Definition::from_descriptor(entry.name.clone(), &entry.descriptor))
            .collect()
    }

    /// Get catalogue configuration.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorLookup for Catalog {
    fn lookup(&self, type_tag: u8) -> Option<Descriptor> {
        self.entries.get(&type_tag).map(|entry| entry.descriptor)
    }
}

fn read_bounded(path: &Path, max_bytes: usize) -> Result<String> {
    let path_metadata = std::fs::symlink_metadata(path)
        .map_err(|err| CatalogError::LoadFailed(format!("{}: {err}", path.display())))?;
    if path_metadata.file_type().is_symlink() {
        return Err(CatalogError::LoadFailed(format!(
            "refusing to load definition symlink: {}",
            path.display()
        )));
    }
    if !path_metadata.is_file() {
        return Err(CatalogError::LoadFailed(format!(
            "not a regular file: {}",
            path.display()
        )));
    }

    let file = std::fs::File::open(path).map_err(|err| {
        CatalogError::LoadFailed(format!("failed opening {}: {err}", path.display()))
    })?;
    let opened_metadata = file
        .metadata()
        .map_err(|err| CatalogError::LoadFailed(err.to_string()))?;

    #[cfg(unix)]
    {
        if !same_file_identity(&path_metadata, &opened_metadata) {
            return Err(CatalogError::LoadFailed(format!(
                "definition file changed during load: {}",
                path.display()
            )));
        }
    }

    if opened_metadata.len() > max_bytes as u64 {
        return Err(CatalogError::LoadFailed(format!(
            "definition file too large ({} bytes): {}",
            opened_metadata.len(),
            path.display()
        )));
    }

    let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
    let mut content = String::new();
    file.take(read_limit)
        .read_to_string(&mut content)
        .map_err(|err| {
            CatalogError::LoadFailed(format!("failed reading {}: {err}", path.display()))
        })?;
    if content.len() > max_bytes {
        return Err(CatalogError::LoadFailed(format!(
            "definition file too large while reading: {}",
            path.display()
        )));
    }
    Ok(content)
}

#[cfg(unix)]
fn same_file_identity(
    path_metadata: &std::fs::Metadata,
    opened_metadata: &std::fs::Metadata,
) -> bool {
    use std::os::unix::fs::MetadataExt;
    path_metadata.dev() == opened_metadata.dev() && path_metadata.ino() == opened_metadata.ino()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use telemframe_frame::{ChecksumOrder, ChecksumRange, FrameReader, FrameWriter, Message};
    use telemframe_messages::{GroundStationData, JetsonLandingInitiationCommand, BUILTIN};

    use super::*;

    const DEFINITIONS: &str = r#"[
        { "name": "Heartbeat", "type": 20, "length": 2 },
        { "name": "Arm", "type": 21, "length": 1,
          "checksum_range": "whole_frame", "checksum_order": "big_endian" }
    ]"#;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn builtin_matches_message_set() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.tags(), vec![0, 2, 3, 5, 7]);
        for descriptor in BUILTIN {
            assert_eq!(catalog.lookup(descriptor.type_tag), Some(descriptor));
        }
        assert_eq!(
            catalog.get(3).map(|entry| entry.name.as_str()),
            Some("JetsonLandingInitiationCommand")
        );
    }

    #[test]
    fn register_and_lookup() {
        let mut catalog = Catalog::new();
        assert!(catalog.is_empty());
        catalog
            .register("Heartbeat", Descriptor::new(20, 2, 2))
            .unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup(20).unwrap().wire_size, 10);
        assert!(catalog.lookup(21).is_none());
    }

    #[test]
    fn duplicate_tag_is_rejected() {
        let mut catalog = Catalog::builtin();
        let err = catalog
            .register("Impostor", Descriptor::new(7, 1, 1))
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicateType { type_tag: 7, ref existing } if existing == "GroundStationData"
        ));
    }

    #[test]
    fn overrides_replace_when_allowed() {
        let mut catalog = Catalog::builtin_with_config(CatalogConfig {
            allow_overrides: true,
            ..CatalogConfig::default()
        });
        catalog
            .register("Replacement", Descriptor::new(7, 1, 1))
            .unwrap();
        assert_eq!(catalog.get(7).unwrap().name, "Replacement");
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn invalid_descriptor_is_rejected() {
        let mut catalog = Catalog::new();
        let bad = Descriptor::new(9, 1, 1).with_checksum_range(ChecksumRange::Span {
            start: 8,
            trailer: 4,
        });
        assert!(matches!(
            catalog.register("Bad", bad),
            Err(CatalogError::Frame(_))
        ));
    }

    #[test]
    fn from_json_loads_definitions() {
        let catalog = Catalog::from_json(DEFINITIONS).unwrap();
        assert_eq!(catalog.tags(), vec![20, 21]);

        let arm = catalog.lookup(21).unwrap();
        assert_eq!(arm.checksum_range, ChecksumRange::WholeFrame);
        assert_eq!(arm.checksum_order, ChecksumOrder::BigEndian);
        assert_eq!(catalog.find_by_name("heartbeat").unwrap().descriptor.wire_size, 10);
    }

    #[test]
    fn invalid_json_fails() {
        assert!(matches!(
            Catalog::from_json("{ not json"),
            Err(CatalogError::InvalidJson(_))
        ));
        assert!(matches!(
            Catalog::from_json(r#"{ "name": "NotAnArray" }"#),
            Err(CatalogError::InvalidJson(_))
        ));
    }

    #[test]
    fn failed_load_registers_nothing() {
        let mut catalog = Catalog::new();
        let json = r#"[
            { "name": "A", "type": 30, "length": 1 },
            { "name": "B", "type": 30, "length": 1 }
        ]"#;
        assert!(matches!(
            catalog.load_json(json),
            Err(CatalogError::DuplicateType { type_tag: 30, .. })
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn definition_count_limit_is_enforced() {
        let config = CatalogConfig {
            max_definitions: 1,
            ..CatalogConfig::default()
        };
        assert!(matches!(
            Catalog::from_json_with_config(DEFINITIONS, config),
            Err(CatalogError::LoadFailed(_))
        ));
    }

    #[test]
    fn from_file_loads_and_extends_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "messages.json", DEFINITIONS);

        let mut catalog = Catalog::builtin();
        assert_eq!(catalog.load_file(&path).unwrap(), 2);
        assert_eq!(catalog.len(), 7);

        let only_file = Catalog::from_file(&path).unwrap();
        assert_eq!(only_file.len(), 2);
    }

    #[test]
    fn file_size_limit_is_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "messages.json", DEFINITIONS);

        let config = CatalogConfig {
            max_file_size: 8,
            ..CatalogConfig::default()
        };
        assert!(matches!(
            Catalog::from_file_with_config(&path, config),
            Err(CatalogError::LoadFailed(_))
        ));
    }

    #[test]
    fn missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Catalog::from_file(&dir.path().join("absent.json")),
            Err(CatalogError::LoadFailed(_))
        ));
    }

    #[test]
    fn directory_is_not_a_definition_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Catalog::from_file(dir.path()),
            Err(CatalogError::LoadFailed(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_definition_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let target = write_file(&dir, "target.json", DEFINITIONS);
        let link = dir.path().join("messages.json");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(matches!(
            Catalog::from_file(&link),
            Err(CatalogError::LoadFailed(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn same_file_identity_distinguishes_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_file(&dir, "first.json", "[]");
        let second = write_file(&dir, "second.json", "[]");

        let first_meta = std::fs::symlink_metadata(&first).unwrap();
        let opened_first = std::fs::File::open(&first).unwrap().metadata().unwrap();
        let opened_second = std::fs::File::open(&second).unwrap().metadata().unwrap();

        assert!(same_file_identity(&first_meta, &opened_first));
        assert!(!same_file_identity(&first_meta, &opened_second));
    }

    #[test]
    fn definitions_roundtrip_through_json() {
        let builtin = Catalog::builtin();
        let json = serde_json::to_string(&builtin.definitions()).unwrap();
        let reloaded = Catalog::from_json(&json).unwrap();

        for tag in builtin.tags() {
            assert_eq!(reloaded.lookup(tag), builtin.lookup(tag));
        }
    }

    #[test]
    fn catalog_drives_stream_reader() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(&GroundStationData::default()).unwrap();
        writer
            .send(&JetsonLandingInitiationCommand { land: true })
            .unwrap();

        let wire = writer.into_inner().into_inner();
        let tags: Vec<u8> = FrameReader::new(Cursor::new(wire), Catalog::builtin())
            .map(|frame| frame.unwrap().type_tag())
            .collect();
        assert_eq!(
            tags,
            [
                GroundStationData::TYPE_TAG,
                JetsonLandingInitiationCommand::TYPE_TAG
            ]
        );
    }
}
