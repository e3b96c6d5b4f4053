/// Per-table extraction settings
///
/// Each published indicator table gets a profile describing where its
/// numbers live and how much of it to keep. Layout detection itself is
/// content-driven; the profile only names columns and labels that have
/// been stable across BCV file revisions.
use serde::{Deserialize, Serialize};

/// Which layout probes to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Run both probes; column first when a totals-row label is configured
    #[default]
    Auto,
    Rows,
    Columns,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableProfile {
    pub name: String,
    pub orientation: Orientation,
    /// Most recent periods kept by extraction
    pub window_size: usize,
    /// Periods kept in a snapshot's history
    pub history_len: usize,
    /// How many top rows may hold the dates header (column-oriented)
    pub date_scan_rows: usize,
    /// Column of the tracked magnitude (row-oriented)
    pub primary_col: usize,
    pub secondary_col: Option<usize>,
    /// Column holding a reported percent change, if the table has one
    pub variation_col: Option<usize>,
    /// First-column label of the totals row (column-oriented)
    pub total_row_label: Option<String>,
    /// Values below this are footnote/placeholder artifacts (column-oriented)
    pub value_floor: f64,
}

impl TableProfile {
    pub const DEFAULT_WINDOW_SIZE: usize = 10;
    pub const DEFAULT_HISTORY_LEN: usize = 8;
    pub const DEFAULT_DATE_SCAN_ROWS: usize = 10;
    pub const DEFAULT_VALUE_FLOOR: f64 = 1000.0;

    /// Weekly monetary liquidity (liquidez_monetaria_semanal)
    ///
    /// One row per week, newest at the top:
    /// ```text
    /// Col 0: Semana (DD/MM/YYYY, sometimes with "(*)")
    /// Col 1: Monedas y Billetes
    /// Col 2: Depósitos a la Vista
    /// Col 3: Depósitos de Ahorro Transferibles
    /// Col 4: Dinero (M1)
    /// Col 5: Cuasidinero
    /// Col 6: Liquidez Monetaria (M2)
    /// Col 7: Variación %
    /// ```
    pub fn liquidity() -> Self {
        Self {
            name: "liquidez_monetaria".to_string(),
            orientation: Orientation::Auto,
            window_size: Self::DEFAULT_WINDOW_SIZE,
            history_len: Self::DEFAULT_HISTORY_LEN,
            date_scan_rows: Self::DEFAULT_DATE_SCAN_ROWS,
            primary_col: 6,
            secondary_col: Some(4),
            variation_col: Some(7),
            total_row_label: None,
            value_floor: Self::DEFAULT_VALUE_FLOOR,
        }
    }

    /// Weekly monetary base (base_monetaria_semanal)
    ///
    /// Categories down the rows, one column per week (oldest on the left).
    /// The dates header sits in the first few rows and the total is the
    /// "USOS" row.
    pub fn base_monetaria() -> Self {
        Self {
            name: "base_monetaria".to_string(),
            orientation: Orientation::Auto,
            window_size: Self::DEFAULT_WINDOW_SIZE,
            history_len: Self::DEFAULT_HISTORY_LEN,
            date_scan_rows: Self::DEFAULT_DATE_SCAN_ROWS,
            primary_col: 1,
            secondary_col: None,
            variation_col: None,
            total_row_label: Some("USOS".to_string()),
            value_floor: Self::DEFAULT_VALUE_FLOOR,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_value_floor(mut self, floor: f64) -> Self {
        self.value_floor = floor;
        self
    }

    pub fn with_window(mut self, window_size: usize, history_len: usize) -> Self {
        self.window_size = window_size;
        self.history_len = history_len;
        self
    }
}

/// The BCV tables this service republishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorTable {
    Liquidity,
    BaseMonetaria,
}

impl IndicatorTable {
    /// File name under the BCV monetary-sector indicators directory
    pub fn file_name(&self) -> &'static str {
        match self {
            IndicatorTable::Liquidity => "liquidez_monetaria_semanal1.xls",
            IndicatorTable::BaseMonetaria => "base_monetaria_semanal.xls",
        }
    }

    pub fn profile(&self) -> TableProfile {
        match self {
            IndicatorTable::Liquidity => TableProfile::liquidity(),
            IndicatorTable::BaseMonetaria => TableProfile::base_monetaria(),
        }
    }
}

impl std::fmt::Display for IndicatorTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndicatorTable::Liquidity => write!(f, "liquidity"),
            IndicatorTable::BaseMonetaria => write!(f, "base_monetaria"),
        }
    }
}

impl std::str::FromStr for IndicatorTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "liquidity" | "liquidez" | "m2" => Ok(IndicatorTable::Liquidity),
            "base_monetaria" | "base-monetaria" | "base" => Ok(IndicatorTable::BaseMonetaria),
            other => Err(format!("unknown indicator table: {other}")),
        }
    }
}
