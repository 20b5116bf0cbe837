//! Sample records shared across integration tests.

use curator_core::{
    ContainerRef, Dataset, DatasetId, LicenseKind, LicenseTerms, Nomination, NominationId,
    NominationStatus, Owner, Principal,
};
use time::OffsetDateTime;

pub const ACCOUNT: &str = "testaccount";

pub fn owner() -> Principal {
    Principal::new("Ada Lovelace", "ada@example.org")
}

pub fn stranger() -> Principal {
    Principal::new("Eve", "eve@example.org")
}

pub fn curator() -> Principal {
    Principal::new("Casey", "casey@example.org")
}

/// A published dataset with content in the `weatherstations` container.
pub fn dataset() -> Dataset {
    let now = OffsetDateTime::now_utc();
    Dataset {
        id: DatasetId::new(),
        name: "Weather Stations".to_string(),
        description: "Hourly readings from 400 stations".to_string(),
        domain: Some("climate".to_string()),
        license: LicenseTerms {
            license_id: Some("cc-by-4.0".to_string()),
            kind: LicenseKind::Standard,
            ..LicenseTerms::default()
        },
        tags: vec!["weather".to_string()],
        is_downloadable: true,
        is_compressed_available: false,
        owners: vec![Owner::new("Ada Lovelace", "ada@example.org")],
        container: Some(ContainerRef::new(ACCOUNT, "weatherstations")),
        created_by: Some("ada@example.org".to_string()),
        created_at: now,
        modified_by: None,
        modified_at: now,
    }
}

/// A freshly submitted nomination with no storage yet.
pub fn pending_nomination() -> Nomination {
    let now = OffsetDateTime::now_utc();
    Nomination {
        id: NominationId::new(),
        dataset_id: None,
        name: "River Gauges".to_string(),
        description: "Daily river gauge levels".to_string(),
        domain: Some("hydrology".to_string()),
        license: LicenseTerms::default(),
        tags: vec!["rivers".to_string()],
        is_downloadable: true,
        is_compressed_available: false,
        contact_name: Some("Sam Submitter".to_string()),
        contact_email: Some("sam@example.org".to_string()),
        status: NominationStatus::PendingApproval,
        attachment: None,
        created_by: Some("sam@example.org".to_string()),
        created_at: now,
        modified_by: None,
        modified_at: now,
    }
}
