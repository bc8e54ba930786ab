use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs::{read_to_string, write};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::catalog::{Inverter, NewInverter, NewPanel, Panel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Panel,
    Inverter,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Panel => f.write_str("panel"),
            RecordKind::Inverter => f.write_str("inverter"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: u32 },

    #[error("catalog file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// On-disk layout of the catalog file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogData {
    #[serde(default)]
    next_panel_id: u32,
    #[serde(default)]
    next_inverter_id: u32,
    #[serde(default)]
    panels: Vec<Panel>,
    #[serde(default)]
    inverters: Vec<Inverter>,
}

impl CatalogData {
    fn allocate_panel_id(&mut self) -> u32 {
        let floor = self.panels.iter().map(|p| p.id).max().unwrap_or(0);
        self.next_panel_id = self.next_panel_id.max(floor) + 1;
        self.next_panel_id
    }

    fn allocate_inverter_id(&mut self) -> u32 {
        let floor = self.inverters.iter().map(|i| i.id).max().unwrap_or(0);
        self.next_inverter_id = self.next_inverter_id.max(floor) + 1;
        self.next_inverter_id
    }
}

/// Panel and inverter records, optionally mirrored to a JSON file.
///
/// Ids are sequential per record kind and never reused after removal.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    data: Arc<RwLock<CatalogData>>,
    path: Option<PathBuf>,
}

impl CatalogStore {
    pub fn in_memory() -> Self {
        Self { data: Arc::new(RwLock::new(CatalogData::default())), path: None }
    }

    /// Opens the catalog file, starting empty when it does not exist yet
    ///
    /// # Arguments
    ///
    /// * 'path' - JSON file to read from and write every change to
    pub async fn open(path: impl Into<PathBuf>) -> CatalogResult<Self> {
        let path = path.into();
        let data = match read_to_string(&path).await {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CatalogData::default(),
            Err(e) => return Err(e.into()),
        };
        info!(
            "[CATALOG] Opened {}: {} panels, {} inverters",
            path.display(),
            data.panels.len(),
            data.inverters.len()
        );
        Ok(Self { data: Arc::new(RwLock::new(data)), path: Some(path) })
    }

    async fn persist(&self, data: &CatalogData) -> CatalogResult<()> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(data)?;
            write(path, json).await?;
            debug!("[CATALOG] Wrote {}", path.display());
        }
        Ok(())
    }

    /// Writes `staged` to the file, then makes it the live catalog.
    /// The live catalog stays untouched when the write fails.
    async fn commit(&self, live: &mut CatalogData, staged: CatalogData) -> CatalogResult<()> {
        self.persist(&staged).await?;
        *live = staged;
        Ok(())
    }

    // ── Panels ───────────────────────────────────────────────────────────────

    pub async fn list_panels(&self) -> Vec<Panel> {
        self.data.read().await.panels.clone()
    }

    pub async fn get_panel(&self, id: u32) -> CatalogResult<Panel> {
        self.data
            .read()
            .await
            .panels
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound { kind: RecordKind::Panel, id })
    }

    pub async fn add_panel(&self, spec: NewPanel) -> CatalogResult<Panel> {
        let mut data = self.data.write().await;
        let mut staged = data.clone();
        let panel = Panel { id: staged.allocate_panel_id(), spec };
        staged.panels.push(panel.clone());
        self.commit(&mut data, staged).await?;
        info!("[CATALOG] Added panel {}: {}", panel.id, panel.spec.name);
        Ok(panel)
    }

    pub async fn remove_panel(&self, id: u32) -> CatalogResult<Panel> {
        let mut data = self.data.write().await;
        let index = data
            .panels
            .iter()
            .position(|p| p.id == id)
            .ok_or(CatalogError::NotFound { kind: RecordKind::Panel, id })?;
        let mut staged = data.clone();
        let panel = staged.panels.remove(index);
        self.commit(&mut data, staged).await?;
        info!("[CATALOG] Removed panel {}", id);
        Ok(panel)
    }

    // ── Inverters ────────────────────────────────────────────────────────────

    pub async fn list_inverters(&self) -> Vec<Inverter> {
        self.data.read().await.inverters.clone()
    }

    pub async fn get_inverter(&self, id: u32) -> CatalogResult<Inverter> {
        self.data
            .read()
            .await
            .inverters
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound { kind: RecordKind::Inverter, id })
    }

    pub async fn add_inverter(&self, spec: NewInverter) -> CatalogResult<Inverter> {
        let mut data = self.data.write().await;
        let mut staged = data.clone();
        let inverter = Inverter { id: staged.allocate_inverter_id(), spec };
        staged.inverters.push(inverter.clone());
        self.commit(&mut data, staged).await?;
        info!("[CATALOG] Added inverter {}: {}", inverter.id, inverter.spec.name);
        Ok(inverter)
    }

    pub async fn remove_inverter(&self, id: u32) -> CatalogResult<Inverter> {
        let mut data = self.data.write().await;
        let index = data
            .inverters
            .iter()
            .position(|i| i.id == id)
            .ok_or(CatalogError::NotFound { kind: RecordKind::Inverter, id })?;
        let mut staged = data.clone();
        let inverter = staged.inverters.remove(index);
        self.commit(&mut data, staged).await?;
        info!("[CATALOG] Removed inverter {}", id);
        Ok(inverter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::fixtures::{new_inverter, new_panel};

    fn temp_catalog_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "solar-sizing-{}-{}-{}.json",
            tag,
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ))
    }

    #[tokio::test]
    async fn test_ids_are_sequential_per_kind() {
        let store = CatalogStore::in_memory();
        let a = store.add_panel(new_panel("A")).await.unwrap();
        let b = store.add_panel(new_panel("B")).await.unwrap();
        let inv = store.add_inverter(new_inverter("I")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(inv.id, 1);
        assert_eq!(store.list_panels().await.len(), 2);
        assert_eq!(store.list_inverters().await.len(), 1);
    }

    #[tokio::test]
    async fn test_removed_ids_not_reused() {
        let store = CatalogStore::in_memory();
        store.add_panel(new_panel("A")).await.unwrap();
        let b = store.add_panel(new_panel("B")).await.unwrap();
        store.remove_panel(b.id).await.unwrap();
        let c = store.add_panel(new_panel("C")).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn test_get_and_remove_missing() {
        let store = CatalogStore::in_memory();
        assert!(matches!(
            store.get_panel(42).await,
            Err(CatalogError::NotFound { kind: RecordKind::Panel, id: 42 })
        ));
        assert!(matches!(
            store.remove_inverter(7).await,
            Err(CatalogError::NotFound { kind: RecordKind::Inverter, id: 7 })
        ));
    }

    #[tokio::test]
    async fn test_get_returns_stored_record() {
        let store = CatalogStore::in_memory();
        let added = store.add_inverter(new_inverter("Primo")).await.unwrap();
        let fetched = store.get_inverter(added.id).await.unwrap();
        assert_eq!(fetched, added);
    }

    #[tokio::test]
    async fn test_file_survives_reopen() {
        let path = temp_catalog_path("reopen");
        {
            let store = CatalogStore::open(&path).await.unwrap();
            store.add_panel(new_panel("A")).await.unwrap();
            store.add_panel(new_panel("B")).await.unwrap();
            store.remove_panel(2).await.unwrap();
            store.add_inverter(new_inverter("I")).await.unwrap();
        }

        let reopened = CatalogStore::open(&path).await.unwrap();
        let panels = reopened.list_panels().await;
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].spec.name, "A");
        assert_eq!(reopened.list_inverters().await.len(), 1);
        // id 2 was handed out before the reopen
        assert_eq!(reopened.add_panel(new_panel("C")).await.unwrap().id, 3);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_open_corrupt_file_fails() {
        let path = temp_catalog_path("corrupt");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(CatalogStore::open(&path).await, Err(CatalogError::Json(_))));
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_hand_written_file_without_counters() {
        let path = temp_catalog_path("counters");
        let seeded = serde_json::json!({
            "panels": [ { "id": 5, "name": "Seeded", "manufacturer": "Jinko", "length": 2.0,
                "width": 1.0, "weight": 30.0, "efficiency": 0.21, "nominal_power": 0.55,
                "open_circuit_voltage": 50.0, "short_circuit_current": 13.0, "mpp_voltage": 42.0,
                "mpp_current": 12.5, "voltage_temperature_coefficient": -0.27,
                "current_temperature_coefficient": 0.05 } ]
        });
        std::fs::write(&path, seeded.to_string()).unwrap();

        let store = CatalogStore::open(&path).await.unwrap();
        assert_eq!(store.get_panel(5).await.unwrap().spec.name, "Seeded");
        assert_eq!(store.add_panel(new_panel("Next")).await.unwrap().id, 6);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_catalog_unchanged() {
        let dir = temp_catalog_path("missing-dir");
        let store = CatalogStore::open(dir.join("catalog.json")).await.unwrap();

        assert!(matches!(store.add_panel(new_panel("A")).await, Err(CatalogError::Io(_))));
        assert!(store.list_panels().await.is_empty());
        assert!(matches!(store.add_inverter(new_inverter("I")).await, Err(CatalogError::Io(_))));
        assert!(store.list_inverters().await.is_empty());

        // the failed add did not use up an id
        assert!(store.add_panel(new_panel("B")).await.is_err());
        assert_eq!(store.data.read().await.next_panel_id, 0);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_removed_record() {
        let path = temp_catalog_path("remove-rollback");
        let store = CatalogStore::open(&path).await.unwrap();
        let panel = store.add_panel(new_panel("A")).await.unwrap();
        let inverter = store.add_inverter(new_inverter("I")).await.unwrap();

        // point the store at a directory that does not exist
        let broken = CatalogStore {
            data: store.data.clone(),
            path: Some(temp_catalog_path("gone").join("catalog.json")),
        };
        assert!(matches!(broken.remove_panel(panel.id).await, Err(CatalogError::Io(_))));
        assert!(matches!(broken.remove_inverter(inverter.id).await, Err(CatalogError::Io(_))));

        assert_eq!(store.get_panel(panel.id).await.unwrap(), panel);
        assert_eq!(store.get_inverter(inverter.id).await.unwrap(), inverter);

        let _ = std::fs::remove_file(&path);
    }
}
