//! `SQLite` schema for the local submission store.

/// Donor registrations.
pub const CREATE_DONORS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS donors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT NOT NULL,
    age INTEGER NOT NULL CHECK (age BETWEEN 18 AND 65),
    gender TEXT NOT NULL,
    blood_type TEXT NOT NULL,
    contact_number TEXT NOT NULL,
    email TEXT NOT NULL,
    address TEXT NOT NULL,
    medical_history TEXT,
    created_at TEXT NOT NULL
)
";

/// Blood requests.
pub const CREATE_BLOOD_REQUESTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS blood_requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    contact_number TEXT NOT NULL,
    blood_type TEXT NOT NULL,
    quantity INTEGER NOT NULL CHECK (quantity > 0),
    hospital_name TEXT NOT NULL,
    patient_name TEXT NOT NULL,
    urgency TEXT NOT NULL,
    patient_condition TEXT,
    created_at TEXT NOT NULL
)
";

/// Index for looking up donors by blood type.
pub const CREATE_DONOR_BLOOD_TYPE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_donors_blood_type ON donors(blood_type)
";

/// Index for triaging open requests by urgency.
pub const CREATE_REQUEST_URGENCY_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_blood_requests_urgency ON blood_requests(urgency)
";

/// Key-value metadata, holds the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Statements making up schema version 1, in order.
pub const V1_STATEMENTS: &[&str] = &[
    CREATE_DONORS_TABLE,
    CREATE_BLOOD_REQUESTS_TABLE,
    CREATE_DONOR_BLOOD_TYPE_INDEX,
    CREATE_REQUEST_URGENCY_INDEX,
];
