//! Nostr protocol data model for Vlogstr.
//!
//! This crate provides the event types, kind taxonomy, and tag construction
//! rules the application uses, with no networking or key material:
//! - NIP-01: Basic protocol (events, serialization, kind classification)
//! - NIP-02: Follow List (Contact List and Petnames)
//! - NIP-09: Event Deletion Request
//! - NIP-19: bech32-encoded entities
//! - NIP-22: Comment (threaded comments on videos and external URLs)
//! - NIP-25: Reactions (likes)
//! - NIP-71: Video Events (kinds 21 and 22)
//! - NIP-78: Arbitrary custom app data (per-user settings)
//!
//! Signing and verification live behind the `Signer` trait in the client
//! crate; everything here operates on already-signed or not-yet-signed events.

mod nip01;
mod nip02;
mod nip09;
mod nip19;
mod nip22;
mod nip25;
mod nip71;
mod nip78;

// NIP-01: Basic protocol
pub use nip01::{
    D_TAG, Event, EventTemplate, KIND_APP_DATA, KIND_BLOB_AUTH, KIND_COMMENT, KIND_CONTACTS,
    KIND_DELETION, KIND_METADATA, KIND_REACTION, KIND_SHORT_TEXT_NOTE, KIND_SHORT_VIDEO,
    KIND_VIDEO, KindClassification, Nip01Error, UnsignedEvent, classify_kind, create_address,
    get_event_hash, is_addressable_kind, is_ephemeral_kind, is_regular_kind, is_replaceable_kind,
    parse_address, serialize_event, sort_events, validate_unsigned_event,
};

// NIP-02: Follow List (Contact List and Petnames)
pub use nip02::{CONTACT_LIST_KIND, Contact, ContactList, Nip02Error};

// NIP-09: Event Deletion Request
pub use nip09::{
    DELETION_REQUEST_KIND, Nip09Error, create_deletion_tags, create_deletion_tags_for_addresses,
    get_deleted_addresses, get_deleted_event_ids, get_deleted_kinds, get_deletion_reason,
    is_deletion_request, should_delete_event,
};

// NIP-19: bech32-encoded entities
pub use nip19::{
    AddressPointer, EventPointer, Nip19Entity, Nip19Error, ProfilePointer, decode, encode_naddr,
    encode_nevent, encode_note, encode_nprofile, encode_npub,
};

// NIP-22: Comment
pub use nip22::{
    COMMENT_KIND, CommentTarget, EventRef, Nip22Error, Scope, build_comment_tags,
    get_parent_address, get_parent_event_id, get_parent_kind, get_root_address, get_root_event_id,
    get_root_kind, get_root_url, is_comment, is_top_level, parent_comment_id, reference_tags_for,
    validate_comment,
};

// NIP-25: Reactions
pub use nip25::{
    LIKE_CONTENT, LIKE_CONTENT_VALUES, Nip25Error, REACTION_KIND, Reaction, ReactionType,
    create_reaction_tags, is_like, is_reaction_kind,
};

// NIP-71: Video Events
pub use nip71::{
    Nip71Error, SHORT_VIDEO_KIND, Segment, VIDEO_KIND, VideoEvent, VideoMeta, extract_hashtags,
    is_video_kind,
};

// NIP-78: Arbitrary custom app data
pub use nip78::{
    APP_DATA_KIND, Nip78Error, create_app_data_tags, get_identifier, has_identifier, is_app_data,
};
