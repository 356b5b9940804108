//! Bill catalog access and bill-document flattening.
//!
//! # Architecture
//!
//! - [`BillCatalog`] - Trait for fetching one raw bill document
//! - [`GovTrackClient`] / [`ProPublicaClient`] - HTTP implementations using reqwest
//! - [`mock::MockBillCatalog`] - Mock for unit tests (behind `test-utils` feature)
//! - [`BillDocument`] - Raw JSON tagged with its source; extraction and
//!   normalization dispatch on the tag
//!
//! # Testing Patterns
//!
//! ## Unit Tests (Mock Implementation)
//!
//! ```ignore
//! use bill_harvest::congress::{mock::MockBillCatalog, BillDocument, SourceKind};
//!
//! let mock = MockBillCatalog::new(SourceKind::GovTrack);
//! mock.set_bill(21, BillDocument::GovTrack(json!({ ... })));
//! ```
//!
//! ## Integration Tests (HTTP Stubbing)
//!
//! ```ignore
//! let server = MockHttpServer::start().await;
//!
//! server
//!     .expect_get("/114/bills/hr/hr21/data.json")
//!     .respond_with_json(json!({ ... }))
//!     .mount()
//!     .await;
//!
//! let client = GovTrackClient::new(server.url());
//! let doc = client.fetch_bill(&BillKey::new(BillType::Hr, 21, 114)).await.unwrap();
//! ```

mod client;
mod extract;
mod normalize;
mod types;

pub use client::{
    build_http_client, BillCatalog, BulkDirCatalog, CongressApiError, GovTrackClient,
    ProPublicaClient,
};
pub use extract::{BillDocument, ExtractError};
pub use normalize::NormalizedBill;
pub use types::{
    ActionRecord, BillKey, BillRecord, BillType, SourceKind, SponsorRole, SponsorshipRecord,
    UnknownBillType, INTRODUCED,
};

#[cfg(any(test, feature = "test-utils"))]
pub use client::mock;
