//! Plan state persistence (billing.json)

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FintrackError;
use crate::models::Plan;

use super::file_io::{read_json, write_json_atomic};

pub struct PlanStore {
    path: PathBuf,
    plan: RwLock<Plan>,
}

impl PlanStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            plan: RwLock::new(Plan::default()),
        }
    }

    pub fn load(&self) -> Result<(), FintrackError> {
        let loaded: Plan = read_json(&self.path)?;
        let mut plan = self.plan.write().map_err(|e| {
            FintrackError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *plan = loaded;
        Ok(())
    }

    pub fn save(&self) -> Result<(), FintrackError> {
        write_json_atomic(&self.path, &self.get()?)
    }

    pub fn get(&self) -> Result<Plan, FintrackError> {
        let plan = self.plan.read().map_err(|e| {
            FintrackError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(plan.clone())
    }

    pub fn set(&self, new_plan: Plan) -> Result<(), FintrackError> {
        let mut plan = self.plan.write().map_err(|e| {
            FintrackError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *plan = new_plan;
        Ok(())
    }
}
