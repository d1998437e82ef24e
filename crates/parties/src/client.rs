use serde::{Deserialize, Serialize};

use mayab_core::{DomainError, DomainResult, EntityId};

/// Client identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub EntityId);

impl ClientId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ClientId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Fulfillment policy configured per client.
///
/// `FirstExit` clients draw from the Hunucma unit warehouse before falling
/// back to Zelma boxes; `NormalExit` draws straight from Zelma; `Pickup`
/// orders are collected at Zelma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitType {
    FirstExit,
    NormalExit,
    Pickup,
}

impl ExitType {
    pub fn as_str(self) -> &'static str {
        match self {
            ExitType::FirstExit => "first_exit",
            ExitType::NormalExit => "normal_exit",
            ExitType::Pickup => "pickup",
        }
    }
}

impl core::fmt::Display for ExitType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A distributor client (the billing/policy entity behind one or more branches).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    id: ClientId,
    trade_name: String,
    exit_type: ExitType,
    active: bool,
}

impl Client {
    pub fn new(id: ClientId, trade_name: impl Into<String>, exit_type: ExitType) -> DomainResult<Self> {
        let trade_name = trade_name.into();
        if trade_name.trim().is_empty() {
            return Err(DomainError::validation("trade_name", "cannot be empty"));
        }
        Ok(Self {
            id,
            trade_name,
            exit_type,
            active: true,
        })
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn trade_name(&self) -> &str {
        &self.trade_name
    }

    pub fn exit_type(&self) -> ExitType {
        self.exit_type
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
