//! Payload envelope encoding and load-time migration.
//!
//! Stored layout: `{"version": <u32>, "data": <payload>}`. Any stored value
//! without that wrapper is a legacy version-1 payload written before
//! envelopes existed.

use crate::persist::{PersistError, PersistResult};
use crate::repo::kv_repo::KvRepository;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Payload version written by this binary.
pub const PAYLOAD_VERSION: u32 = 2;
const LEGACY_PAYLOAD_VERSION: u32 = 1;

/// Which collection a payload holds; migrations are shape-specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Projects,
    Notifications,
    Session,
}

impl PayloadKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Notifications => "notifications",
            Self::Session => "session",
        }
    }
}

#[derive(Clone, Copy)]
struct PayloadMigration {
    to_version: u32,
    apply: fn(PayloadKind, &mut Value),
}

const PAYLOAD_MIGRATIONS: &[PayloadMigration] = &[PayloadMigration {
    to_version: 2,
    apply: migrate_v1_to_v2,
}];

#[derive(Serialize)]
struct EnvelopeRef<'a, T: ?Sized> {
    version: u32,
    data: &'a T,
}

/// Serializes `data` inside a current-version envelope.
pub fn encode_payload<T: Serialize + ?Sized>(key: &str, data: &T) -> PersistResult<String> {
    let envelope = EnvelopeRef {
        version: PAYLOAD_VERSION,
        data,
    };
    serde_json::to_string(&envelope).map_err(|source| PersistError::Encode {
        key: key.to_string(),
        source,
    })
}

/// Parses a stored value, migrating it to the current version first.
///
/// # Errors
/// - `Decode` when the value is not JSON or does not match `T`.
/// - `InvalidEnvelope` when the wrapper carries a bad `version`.
/// - `UnsupportedPayloadVersion` when the value was written by a newer binary.
pub fn decode_payload<T: DeserializeOwned>(
    key: &str,
    kind: PayloadKind,
    raw: &str,
) -> PersistResult<T> {
    let value: Value = serde_json::from_str(raw).map_err(|source| PersistError::Decode {
        key: key.to_string(),
        source,
    })?;
    let (stored_version, mut data) = split_envelope(key, value)?;

    if stored_version > PAYLOAD_VERSION {
        return Err(PersistError::UnsupportedPayloadVersion {
            key: key.to_string(),
            stored_version,
            latest_supported: PAYLOAD_VERSION,
        });
    }

    for migration in PAYLOAD_MIGRATIONS
        .iter()
        .filter(|migration| migration.to_version > stored_version)
    {
        (migration.apply)(kind, &mut data);
    }
    if stored_version < PAYLOAD_VERSION {
        info!(
            "event=payload_migrate module=persist status=ok kind={} from_version={stored_version} to_version={PAYLOAD_VERSION}",
            kind.as_str()
        );
    }

    serde_json::from_value(data).map_err(|source| PersistError::Decode {
        key: key.to_string(),
        source,
    })
}

/// Reads and decodes the payload stored under `key`.
///
/// Returns `Ok(None)` when nothing is stored.
pub fn read_payload<T, R>(repo: &R, key: &str, kind: PayloadKind) -> PersistResult<Option<T>>
where
    T: DeserializeOwned,
    R: KvRepository + ?Sized,
{
    match repo.get_value(key)? {
        Some(raw) => decode_payload(key, kind, &raw).map(Some),
        None => {
            debug!(
                "event=payload_read module=persist status=empty kind={}",
                kind.as_str()
            );
            Ok(None)
        }
    }
}

/// Encodes `data` and stores it under `key`.
pub fn write_payload<T, R>(repo: &R, key: &str, data: &T) -> PersistResult<()>
where
    T: Serialize + ?Sized,
    R: KvRepository + ?Sized,
{
    let encoded = encode_payload(key, data)?;
    repo.set_value(key, &encoded)?;
    Ok(())
}

fn split_envelope(key: &str, value: Value) -> PersistResult<(u32, Value)> {
    match value {
        Value::Object(mut map) if map.contains_key("version") && map.contains_key("data") => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .and_then(|version| u32::try_from(version).ok())
                .filter(|version| *version >= LEGACY_PAYLOAD_VERSION)
                .ok_or_else(|| PersistError::InvalidEnvelope {
                    key: key.to_string(),
                    message: "`version` must be a positive integer".to_string(),
                })?;
            let data = map.remove("data").unwrap_or(Value::Null);
            Ok((version, data))
        }
        legacy => Ok((LEGACY_PAYLOAD_VERSION, legacy)),
    }
}

// v2 introduced the envelope. Legacy writers stored fractional progress,
// capitalized role names, and notifications without `title`/`type`.
fn migrate_v1_to_v2(kind: PayloadKind, data: &mut Value) {
    match kind {
        PayloadKind::Projects => {
            for project in array_items_mut(data) {
                round_progress(project);
            }
        }
        PayloadKind::Notifications => {
            for notification in array_items_mut(data) {
                fill_notification_defaults(notification);
            }
        }
        PayloadKind::Session => normalize_role(data),
    }
}

fn array_items_mut(value: &mut Value) -> impl Iterator<Item = &mut Value> {
    value.as_array_mut().into_iter().flatten()
}

fn round_progress(project: &mut Value) {
    let Some(fields) = project.as_object_mut() else {
        return;
    };
    if let Some(progress) = fields.get("progress").and_then(Value::as_f64) {
        let whole = progress.round().clamp(0.0, f64::from(u32::MAX)) as u32;
        fields.insert("progress".to_string(), Value::from(whole));
    }
}

fn fill_notification_defaults(notification: &mut Value) {
    let Some(fields) = notification.as_object_mut() else {
        return;
    };
    fields.entry("title").or_insert_with(|| Value::from(""));
    fields.entry("type").or_insert_with(|| Value::from("info"));
    fields.entry("isRead").or_insert(Value::Bool(false));
}

fn normalize_role(session: &mut Value) {
    let Some(fields) = session.as_object_mut() else {
        return;
    };
    if let Some(role) = fields.get("role").and_then(Value::as_str) {
        let normalized = role.trim().to_ascii_lowercase();
        fields.insert("role".to_string(), Value::from(normalized));
    }
}
