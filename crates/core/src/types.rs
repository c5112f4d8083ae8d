use rand::Rng;

/// Project ids are short opaque alphanumeric strings (e.g. `ABCD1234`).
pub type ProjectId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Length of a generated project id.
pub const PROJECT_ID_LENGTH: usize = 8;

/// Uppercase alphanumerics without the easily confused `0`, `O`, `1`, `I`.
const PROJECT_ID_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a new random project id.
pub fn generate_project_id() -> ProjectId {
    let mut rng = rand::rng();
    (0..PROJECT_ID_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..PROJECT_ID_ALPHABET.len());
            char::from(PROJECT_ID_ALPHABET[idx])
        })
        .collect()
}

/// Generate a time-ordered id for child records (messages, change requests,
/// audit entries).
pub fn generate_record_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
