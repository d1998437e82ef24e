use serde::{Deserialize, Serialize};

use mayab_core::{DomainError, DomainResult, EntityId};

use crate::client::ClientId;

/// Branch identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(pub EntityId);

impl BranchId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for BranchId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A client's delivery branch.
///
/// Branch names are globally unique: webhook rows resolve branches by this
/// display name alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    id: BranchId,
    client_id: ClientId,
    name: String,
    delivery_notes: Option<String>,
    active: bool,
}

impl Branch {
    pub fn new(
        id: BranchId,
        client_id: ClientId,
        name: impl Into<String>,
        delivery_notes: Option<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name", "cannot be empty"));
        }
        Ok(Self {
            id,
            client_id,
            name,
            delivery_notes,
            active: true,
        })
    }

    pub fn id(&self) -> BranchId {
        self.id
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn delivery_notes(&self) -> Option<&str> {
        self.delivery_notes.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Display-name comparison used by webhook resolution: trimmed,
    /// case-insensitive, exact otherwise.
    pub fn name_matches(&self, candidate: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(candidate.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_matching_ignores_case_and_padding() {
        let branch = Branch::new(
            BranchId::new(EntityId::new()),
            ClientId::new(EntityId::new()),
            "Six Centro",
            None,
        )
        .unwrap();

        assert!(branch.name_matches("six centro"));
        assert!(branch.name_matches("  SIX CENTRO "));
        assert!(!branch.name_matches("Six Norte"));
    }
}
