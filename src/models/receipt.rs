// src/models/receipt.rs
//! Audit receipts for credential activity.
//!
//! A receipt records that a credential was issued to, or presented to, a
//! named relying party at a point in time. Receipts are append-only; they
//! are written only after a response has been successfully sent.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a receipt records.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptAction {
    /// A credential was issued to the holder.
    Issuance,
    /// A credential was presented to a relying party.
    Presentation,
}

/// One append-only audit record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Receipt id.
    pub id: String,

    /// What happened.
    pub action: ReceiptAction,

    /// Id of the credential involved.
    pub vc_id: String,

    /// When it happened, milliseconds since epoch.
    pub activity_date: i64,

    /// DID of the relying party.
    pub entity_identifier: String,

    /// Display name of the relying party.
    pub entity_name: String,
}

impl Receipt {
    /// Creates a receipt stamped with the current time.
    pub fn new(action: ReceiptAction, vc_id: &str, entity_identifier: &str, entity_name: &str) -> Self {
        Receipt {
            id: Uuid::new_v4().to_string(),
            action,
            vc_id: vc_id.to_string(),
            activity_date: Utc::now().timestamp_millis(),
            entity_identifier: entity_identifier.to_string(),
            entity_name: entity_name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_records_action_and_relying_party() {
        let receipt =
            Receipt::new(ReceiptAction::Presentation, "vc-1", "did:ion:rp", "Example Corp");
        assert_eq!(receipt.action, ReceiptAction::Presentation);
        assert_eq!(receipt.vc_id, "vc-1");
        assert_eq!(receipt.entity_identifier, "did:ion:rp");
        assert_eq!(receipt.entity_name, "Example Corp");
        assert!(receipt.activity_date > 0);
        assert!(!receipt.id.is_empty());
    }

    #[test]
    fn test_receipts_get_unique_ids() {
        let a = Receipt::new(ReceiptAction::Issuance, "vc-1", "did:ion:rp", "RP");
        let b = Receipt::new(ReceiptAction::Issuance, "vc-1", "did:ion:rp", "RP");
        assert_ne!(a.id, b.id);
    }
}
