/// Directory the acquisition job writes the board snapshot into
pub const DEFAULT_SNAPSHOT_DIR: &str = "/tmp/cache_output/quantara/date_info";

/// File name of the board snapshot inside the snapshot directory
pub const SNAPSHOT_FILE_NAME: &str = "board_info.json";

/// Command that regenerates the board snapshot
pub const SNAPSHOT_REMEDIATION: &str = "python -m common.board_data_manager update";

/// Placeholder for snapshot metadata fields the producer did not write
pub const UNKNOWN_METADATA: &str = "unknown";

/// Width of a normalized instrument code
pub const INSTRUMENT_CODE_LEN: usize = 6;

/// Synthetic root names of the derived trees
pub const INDUSTRY_ROOT: &str = "Industry";
pub const CONCEPT_ROOT: &str = "Concept";
pub const INDEX_ROOT: &str = "Index";

/// Membership row headers carrying the instrument code, per family
pub const INDUSTRY_CODE_HEADERS: &[&str] = &["股票代码", "stock_code"];
pub const INDUSTRY_NAME_HEADERS: &[&str] = &["股票简称", "stock_name"];
pub const CONCEPT_CODE_HEADERS: &[&str] = &["股票代码", "代码"];
pub const CONCEPT_NAME_HEADERS: &[&str] = &["股票简称", "名称"];
