//! Blossom (BUD-02) upload client for Vlogstr.
//!
//! This crate provides:
//! - Client-side SHA-256 hashing of the blob before transfer
//! - Kind 24242 upload authorization signed through the `Signer` trait
//! - Raw-body `PUT {server}/upload` with streamed progress reporting
//! - `BlobDescriptor` parsing and NIP-94-style tag generation
//!
//! Only uploads are implemented; listing, mirroring, and deletion of blobs
//! are out of scope for the application.

mod auth;
mod client;
mod descriptor;
mod error;
mod progress;

pub use auth::{
    AUTH_EXPIRATION_SECS, UPLOAD_AUTH_KIND, authorization_header, sha256_hex,
    upload_auth_template,
};
pub use client::{
    BlossomClient, DEFAULT_UPLOAD_TIMEOUT, MAX_UPLOAD_TIMEOUT, MIN_UPLOAD_TIMEOUT, UploadOptions,
};
pub use descriptor::BlobDescriptor;
pub use error::{Result, UploadError};
pub use progress::{ProgressFn, ProgressReporter};
