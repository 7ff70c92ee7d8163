//! In-memory repository for workplaces.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::workplace::{
    domain::{Workplace, WorkplaceCode, WorkplaceId},
    ports::{WorkplaceRepository, WorkplaceRepositoryError, WorkplaceRepositoryResult},
};

/// Thread-safe in-memory workplace repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkplaceRepository {
    state: Arc<RwLock<InMemoryWorkplaceState>>,
}

#[derive(Debug, Default)]
struct InMemoryWorkplaceState {
    workplaces: HashMap<WorkplaceId, Workplace>,
    code_index: HashMap<WorkplaceCode, WorkplaceId>,
}

impl InMemoryWorkplaceRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> WorkplaceRepositoryError {
    WorkplaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn sorted_by_name<'a>(workplaces: impl Iterator<Item = &'a Workplace>) -> Vec<Workplace> {
    let mut listed: Vec<Workplace> = workplaces.cloned().collect();
    listed.sort_by(|left, right| {
        left.name()
            .cmp(right.name())
            .then_with(|| left.code().cmp(right.code()))
    });
    listed
}

#[async_trait]
impl WorkplaceRepository for InMemoryWorkplaceRepository {
    async fn store(&self, workplace: &Workplace) -> WorkplaceRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.workplaces.contains_key(&workplace.id()) {
            return Err(WorkplaceRepositoryError::DuplicateWorkplace(workplace.id()));
        }
        if state.code_index.contains_key(workplace.code()) {
            return Err(WorkplaceRepositoryError::DuplicateCode(
                workplace.code().clone(),
            ));
        }

        state
            .code_index
            .insert(workplace.code().clone(), workplace.id());
        state.workplaces.insert(workplace.id(), workplace.clone());
        Ok(())
    }

    async fn update(&self, workplace: &Workplace) -> WorkplaceRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;

        let old_code = state
            .workplaces
            .get(&workplace.id())
            .ok_or(WorkplaceRepositoryError::NotFound(workplace.id()))?
            .code()
            .clone();

        if *workplace.code() != old_code {
            if let Some(&indexed_id) = state.code_index.get(workplace.code())
                && indexed_id != workplace.id()
            {
                return Err(WorkplaceRepositoryError::DuplicateCode(
                    workplace.code().clone(),
                ));
            }
            state.code_index.remove(&old_code);
            state
                .code_index
                .insert(workplace.code().clone(), workplace.id());
        }

        state.workplaces.insert(workplace.id(), workplace.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: WorkplaceId) -> WorkplaceRepositoryResult<Option<Workplace>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.workplaces.get(&id).cloned())
    }

    async fn find_by_code(
        &self,
        code: &WorkplaceCode,
    ) -> WorkplaceRepositoryResult<Option<Workplace>> {
        let state = self.state.read().map_err(poisoned)?;
        let workplace = state
            .code_index
            .get(code)
            .and_then(|id| state.workplaces.get(id))
            .cloned();
        Ok(workplace)
    }

    async fn list_all(&self) -> WorkplaceRepositoryResult<Vec<Workplace>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(sorted_by_name(state.workplaces.values()))
    }

    async fn list_active(&self) -> WorkplaceRepositoryResult<Vec<Workplace>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(sorted_by_name(
            state.workplaces.values().filter(|w| w.is_active()),
        ))
    }
}
