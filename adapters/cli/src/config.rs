use std::{collections::HashSet, fs, path::Path};

use anyhow::{bail, Context, Result};
use gridpack_core::{GridDimensions, Item, ItemId, ItemKind, ItemSize};
use serde::Deserialize;

/// Configuration used when no file is supplied.
const BUILTIN_CONFIG: &str = r#"
[grid]
width = 10
height = 6

[[items]]
name = "item01"
width = 1
height = 1
score = 5

[[items]]
name = "item02"
width = 2
height = 2
score = 10

[[items]]
name = "item03"
width = 3
height = 1
score = 15
"#;

/// Catalog ids run from 1 and each renders as a single base-36 digit.
const MAX_CATALOG_ITEMS: usize = 35;

/// Grid size and item catalog for one session.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Config {
    pub(crate) dimensions: GridDimensions,
    pub(crate) catalog: Catalog,
}

impl Config {
    /// Loads and validates a TOML configuration file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config at {}", path.display()))
    }

    /// Configuration used when no file is supplied.
    pub(crate) fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CONFIG).context("invalid built-in config")
    }

    fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).context("failed to parse config toml contents")?;
        let dimensions = GridDimensions::new(file.grid.width, file.grid.height)
            .context("invalid [grid] dimensions")?;
        if file.items.len() > MAX_CATALOG_ITEMS {
            bail!(
                "catalog lists {} items but at most {MAX_CATALOG_ITEMS} are supported",
                file.items.len()
            );
        }

        let mut names = HashSet::new();
        let mut entries = Vec::with_capacity(file.items.len());
        for (index, raw) in file.items.into_iter().enumerate() {
            if !names.insert(raw.name.clone()) {
                bail!("catalog contains duplicate item `{}`", raw.name);
            }
            let size = ItemSize::new(raw.width, raw.height)
                .with_context(|| format!("invalid size for item `{}`", raw.name))?;
            let item = Item::from_size(catalog_id(index)?, size, raw.score).with_kind(raw.kind);
            entries.push(CatalogEntry {
                name: raw.name,
                item,
            });
        }

        Ok(Self {
            dimensions,
            catalog: Catalog { entries },
        })
    }

    /// Replaces the configured grid size with command-line overrides.
    pub(crate) fn override_dimensions(
        &mut self,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<()> {
        if width.is_none() && height.is_none() {
            return Ok(());
        }
        let width = width.unwrap_or(self.dimensions.width());
        let height = height.unwrap_or(self.dimensions.height());
        self.dimensions =
            GridDimensions::new(width, height).context("invalid grid size override")?;
        Ok(())
    }
}

fn catalog_id(index: usize) -> Result<ItemId> {
    let id = u32::try_from(index + 1).context("catalog index does not fit an item id")?;
    Ok(ItemId::new(id))
}

/// Items a player may pick, in configuration order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Looks up an entry by its catalog name.
    pub(crate) fn find(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}

/// Named item offered by the catalog.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CatalogEntry {
    pub(crate) name: String,
    pub(crate) item: Item,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    grid: GridSection,
    #[serde(default)]
    items: Vec<ItemSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ItemSection {
    name: String,
    width: u32,
    height: u32,
    score: i32,
    #[serde(default)]
    kind: ItemKind,
}
