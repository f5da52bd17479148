//! Number format types

/// Number format for cell display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (default)
    #[default]
    General,

    /// Built-in format by ID
    BuiltIn(u32),

    /// Custom format string
    Custom(String),
}

/// Built-in formats every reader knows without a `<numFmt>` record
const BUILTIN_FORMATS: [(u32, &str); 36] = [
    (0, "General"),
    (1, "0"),
    (2, "0.00"),
    (3, "#,##0"),
    (4, "#,##0.00"),
    (5, r##""$"#,##0_);("$"#,##0)"##),
    (6, r##""$"#,##0_);[Red]("$"#,##0)"##),
    (7, r##""$"#,##0.00_);("$"#,##0.00)"##),
    (8, r##""$"#,##0.00_);[Red]("$"#,##0.00)"##),
    (9, "0%"),
    (10, "0.00%"),
    (11, "0.00E+00"),
    (12, "# ?/?"),
    (13, "# ??/??"),
    (14, "mm-dd-yy"),
    (15, "d-mmm-yy"),
    (16, "d-mmm"),
    (17, "mmm-yy"),
    (18, "h:mm AM/PM"),
    (19, "h:mm:ss AM/PM"),
    (20, "h:mm"),
    (21, "h:mm:ss"),
    (22, "m/d/yy h:mm"),
    (37, "#,##0 ;(#,##0)"),
    (38, "#,##0 ;[Red](#,##0)"),
    (39, "#,##0.00;(#,##0.00)"),
    (40, "#,##0.00;[Red](#,##0.00)"),
    (41, r##"_(* #,##0_);_(* \(#,##0\);_(* "-"_);_(@_)"##),
    (42, r##"_("$"* #,##0_);_("$"* \(#,##0\);_("$"* "-"_);_(@_)"##),
    (43, r##"_(* #,##0.00_);_(* \(#,##0.00\);_(* "-"??_);_(@_)"##),
    (44, r##"_("$"* #,##0.00_);_("$"* \(#,##0.00\);_("$"* "-"??_);_(@_)"##),
    (45, "mm:ss"),
    (46, "[h]:mm:ss"),
    (47, "mmss.0"),
    (48, "##0.0E+0"),
    (49, "@"),
];

impl NumberFormat {
    /// First ID available for custom formats
    pub const FIRST_CUSTOM_ID: u32 = 164;

    /// Format from its code, resolving built-in codes to their ID
    ///
    /// ```
    /// use xlreport_core::NumberFormat;
    ///
    /// assert_eq!(NumberFormat::from_code("0.00%"), NumberFormat::BuiltIn(10));
    /// assert_eq!(NumberFormat::from_code("General"), NumberFormat::General);
    /// assert_eq!(
    ///     NumberFormat::from_code("#,##0.00 \"€\""),
    ///     NumberFormat::Custom("#,##0.00 \"€\"".into())
    /// );
    /// ```
    pub fn from_code(code: &str) -> Self {
        match BUILTIN_FORMATS.iter().find(|(_, c)| *c == code) {
            Some((0, _)) => NumberFormat::General,
            Some((id, _)) => NumberFormat::BuiltIn(*id),
            None => NumberFormat::Custom(code.to_string()),
        }
    }

    /// Format for a built-in ID as referenced by `numFmtId`
    pub fn from_id(id: u32) -> Self {
        if id == 0 {
            NumberFormat::General
        } else {
            NumberFormat::BuiltIn(id)
        }
    }

    /// The format code
    pub fn format_string(&self) -> &str {
        match self {
            NumberFormat::General => "General",
            NumberFormat::BuiltIn(id) => BUILTIN_FORMATS
                .iter()
                .find(|(i, _)| i == id)
                .map_or("General", |(_, code)| code),
            NumberFormat::Custom(s) => s,
        }
    }

    pub fn is_general(&self) -> bool {
        self.format_string() == "General"
    }
}
