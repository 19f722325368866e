//! NIP-19: bech32-encoded entities
//!
//! Human-friendly identifiers for profiles, events, and addressable content:
//! - `npub` / `note`: bare 32-byte pubkey / event id
//! - `nprofile` / `nevent` / `naddr`: TLV-encoded pointers that may carry
//!   relay hints, the author, and the kind
//!
//! The generic `/:identifier` route decodes one of these into the matching
//! view (profile, note, event, addressable content).
//!
//! See: <https://github.com/nostr-protocol/nips/blob/master/19.md>

use bech32::{Bech32, Hrp};
use thiserror::Error;

const TLV_SPECIAL: u8 = 0;
const TLV_RELAY: u8 = 1;
const TLV_AUTHOR: u8 = 2;
const TLV_KIND: u8 = 3;

/// Errors that can occur during NIP-19 operations
#[derive(Debug, Error)]
pub enum Nip19Error {
    #[error("bech32 encode error: {0}")]
    Bech32Encode(String),

    #[error("bech32 decode error: {0}")]
    Bech32Decode(String),

    #[error("unknown prefix: {0}")]
    UnknownPrefix(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/// Pointer to a profile with optional relay hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePointer {
    /// Profile public key (hex)
    pub pubkey: String,
    /// Relays where the profile is likely found
    pub relays: Vec<String>,
}

/// Pointer to an event with optional relay hints, author, and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPointer {
    /// Event id (hex)
    pub id: String,
    /// Relays where the event is likely found
    pub relays: Vec<String>,
    /// Author public key (hex), if known
    pub author: Option<String>,
    /// Event kind, if known
    pub kind: Option<u16>,
}

/// Pointer to an addressable event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressPointer {
    /// The d-tag identifier
    pub identifier: String,
    /// Author public key (hex)
    pub pubkey: String,
    /// Event kind
    pub kind: u16,
    /// Relays where the event is likely found
    pub relays: Vec<String>,
}

/// A decoded NIP-19 entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nip19Entity {
    /// Bare public key
    Npub(String),
    /// Bare event id
    Note(String),
    /// Profile pointer with metadata
    Nprofile(ProfilePointer),
    /// Event pointer with metadata
    Nevent(EventPointer),
    /// Addressable event pointer
    Naddr(AddressPointer),
}

fn encode_bech32(hrp: &str, data: &[u8]) -> Result<String, Nip19Error> {
    let hrp = Hrp::parse(hrp).map_err(|e| Nip19Error::Bech32Encode(e.to_string()))?;
    bech32::encode::<Bech32>(hrp, data).map_err(|e| Nip19Error::Bech32Encode(e.to_string()))
}

fn decode_hex_32(hex_str: &str) -> Result<[u8; 32], Nip19Error> {
    let bytes = hex::decode(hex_str).map_err(|e| Nip19Error::InvalidHex(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| Nip19Error::InvalidPayload("expected 32 bytes".to_string()))
}

/// Encode a hex public key as an npub.
pub fn encode_npub(pubkey: &str) -> Result<String, Nip19Error> {
    encode_bech32("npub", &decode_hex_32(pubkey)?)
}

/// Encode a hex event id as a note.
pub fn encode_note(event_id: &str) -> Result<String, Nip19Error> {
    encode_bech32("note", &decode_hex_32(event_id)?)
}

fn push_tlv(out: &mut Vec<u8>, tlv_type: u8, value: &[u8]) {
    out.push(tlv_type);
    out.push(value.len() as u8);
    out.extend_from_slice(value);
}

/// Encode a profile pointer as an nprofile.
pub fn encode_nprofile(pointer: &ProfilePointer) -> Result<String, Nip19Error> {
    let mut data = Vec::new();
    push_tlv(&mut data, TLV_SPECIAL, &decode_hex_32(&pointer.pubkey)?);
    for relay in &pointer.relays {
        push_tlv(&mut data, TLV_RELAY, relay.as_bytes());
    }
    encode_bech32("nprofile", &data)
}

/// Encode an event pointer as an nevent.
pub fn encode_nevent(pointer: &EventPointer) -> Result<String, Nip19Error> {
    let mut data = Vec::new();
    push_tlv(&mut data, TLV_SPECIAL, &decode_hex_32(&pointer.id)?);
    for relay in &pointer.relays {
        push_tlv(&mut data, TLV_RELAY, relay.as_bytes());
    }
    if let Some(author) = &pointer.author {
        push_tlv(&mut data, TLV_AUTHOR, &decode_hex_32(author)?);
    }
    if let Some(kind) = pointer.kind {
        push_tlv(&mut data, TLV_KIND, &u32::from(kind).to_be_bytes());
    }
    encode_bech32("nevent", &data)
}

/// Encode an address pointer as an naddr.
pub fn encode_naddr(pointer: &AddressPointer) -> Result<String, Nip19Error> {
    let mut data = Vec::new();
    push_tlv(&mut data, TLV_SPECIAL, pointer.identifier.as_bytes());
    for relay in &pointer.relays {
        push_tlv(&mut data, TLV_RELAY, relay.as_bytes());
    }
    push_tlv(&mut data, TLV_AUTHOR, &decode_hex_32(&pointer.pubkey)?);
    push_tlv(&mut data, TLV_KIND, &u32::from(pointer.kind).to_be_bytes());
    encode_bech32("naddr", &data)
}

struct Tlv {
    special: Vec<Vec<u8>>,
    relays: Vec<String>,
    author: Option<String>,
    kind: Option<u16>,
}

fn parse_tlv(data: &[u8]) -> Result<Tlv, Nip19Error> {
    let mut tlv = Tlv {
        special: Vec::new(),
        relays: Vec::new(),
        author: None,
        kind: None,
    };
    let mut rest = data;
    while !rest.is_empty() {
        if rest.len() < 2 {
            return Err(Nip19Error::InvalidPayload("truncated TLV header".to_string()));
        }
        let (tlv_type, len) = (rest[0], rest[1] as usize);
        rest = &rest[2..];
        if rest.len() < len {
            return Err(Nip19Error::InvalidPayload("truncated TLV value".to_string()));
        }
        let value = &rest[..len];
        rest = &rest[len..];

        match tlv_type {
            TLV_SPECIAL => tlv.special.push(value.to_vec()),
            TLV_RELAY => tlv.relays.push(
                String::from_utf8(value.to_vec())
                    .map_err(|_| Nip19Error::InvalidPayload("relay not utf-8".to_string()))?,
            ),
            TLV_AUTHOR => {
                if value.len() != 32 {
                    return Err(Nip19Error::InvalidPayload("author must be 32 bytes".to_string()));
                }
                tlv.author = Some(hex::encode(value));
            }
            TLV_KIND => {
                let bytes: [u8; 4] = value
                    .try_into()
                    .map_err(|_| Nip19Error::InvalidPayload("kind must be 4 bytes".to_string()))?;
                tlv.kind = Some(u32::from_be_bytes(bytes) as u16);
            }
            // Unknown TLV types are ignored for forward compatibility
            _ => {}
        }
    }
    Ok(tlv)
}

fn single_special(tlv: &Tlv) -> Result<&[u8], Nip19Error> {
    tlv.special
        .first()
        .map(|v| v.as_slice())
        .ok_or_else(|| Nip19Error::InvalidPayload("missing special TLV entry".to_string()))
}

/// Decode any NIP-19 identifier into its entity.
pub fn decode(encoded: &str) -> Result<Nip19Entity, Nip19Error> {
    let (hrp, data) =
        bech32::decode(encoded).map_err(|e| Nip19Error::Bech32Decode(e.to_string()))?;

    match hrp.as_str() {
        "npub" => {
            if data.len() != 32 {
                return Err(Nip19Error::InvalidPayload("npub must be 32 bytes".to_string()));
            }
            Ok(Nip19Entity::Npub(hex::encode(data)))
        }
        "note" => {
            if data.len() != 32 {
                return Err(Nip19Error::InvalidPayload("note must be 32 bytes".to_string()));
            }
            Ok(Nip19Entity::Note(hex::encode(data)))
        }
        "nprofile" => {
            let tlv = parse_tlv(&data)?;
            let pubkey = single_special(&tlv)?;
            if pubkey.len() != 32 {
                return Err(Nip19Error::InvalidPayload("pubkey must be 32 bytes".to_string()));
            }
            Ok(Nip19Entity::Nprofile(ProfilePointer {
                pubkey: hex::encode(pubkey),
                relays: tlv.relays,
            }))
        }
        "nevent" => {
            let tlv = parse_tlv(&data)?;
            let id = single_special(&tlv)?;
            if id.len() != 32 {
                return Err(Nip19Error::InvalidPayload("event id must be 32 bytes".to_string()));
            }
            Ok(Nip19Entity::Nevent(EventPointer {
                id: hex::encode(id),
                relays: tlv.relays.clone(),
                author: tlv.author.clone(),
                kind: tlv.kind,
            }))
        }
        "naddr" => {
            let tlv = parse_tlv(&data)?;
            let identifier = String::from_utf8(single_special(&tlv)?.to_vec())
                .map_err(|_| Nip19Error::InvalidPayload("identifier not utf-8".to_string()))?;
            let pubkey = tlv
                .author
                .clone()
                .ok_or_else(|| Nip19Error::InvalidPayload("naddr requires author".to_string()))?;
            let kind = tlv
                .kind
                .ok_or_else(|| Nip19Error::InvalidPayload("naddr requires kind".to_string()))?;
            Ok(Nip19Entity::Naddr(AddressPointer {
                identifier,
                pubkey,
                kind,
                relays: tlv.relays,
            }))
        }
        other => Err(Nip19Error::UnknownPrefix(other.to_string())),
    }
}
