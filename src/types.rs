/// Individual medical practice identifier.
/// Example: `P81001`
pub type PracticeCode = String;
/// Primary Care Network identifier carried by spreadsheet rows and
/// geometry `code` properties.
/// Example: `U02675`
pub type PcnCode = String;
/// Integrated Care Board (higher-level region) identifier.
/// Example: `01K`
pub type RegionCode = String;
/// Clinical system supplier name as it appears in the tabular extract.
/// Examples: `EMIS`, `TPP`
pub type SupplierName = String;
/// Column header text exactly as found in a raw source file.
/// Example: `Partner\nOrganisation\nCode`
pub type RawHeader = String;
/// Canonical field name a raw header is renamed to.
/// Examples: `practice_code`, `pcn_code`, `system_supplier`
pub type CanonicalField = String;
