use thiserror::Error;

/******************************************\
|==========================================|
|                 Variants                 |
|==========================================|
\******************************************/

/// # Variant tag
///
/// Identifies the rule set a board is played under. The tag is consulted
/// only at specialisation boundaries; day-to-day queries go through the
/// board's predicate methods.

#[rustfmt::skip]
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    #[default]
    Standard, Anti, Atomic, Crazyhouse, Horde, Losers, Race, Relay,
}

impl Variant {
    /// Number of elements in the Variant enum
    pub const NUM: usize = 8;
}

crate::impl_from_to_primitive!(Variant);
crate::impl_enum_iter!(Variant);

impl Variant {
    /// The UCI_Variant name
    pub const fn name(self) -> &'static str {
        match self {
            Variant::Standard => "chess",
            Variant::Anti => "giveaway",
            Variant::Atomic => "atomic",
            Variant::Crazyhouse => "crazyhouse",
            Variant::Horde => "horde",
            Variant::Losers => "losers",
            Variant::Race => "racingkings",
            Variant::Relay => "relay",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Variant {
    type Err = ParseVariantError;

    /// Parses a variant name, accepting the common aliases
    ///
    /// ## Examples
    ///
    /// ```
    /// use varius::core::Variant;
    ///
    /// assert_eq!("atomic".parse::<Variant>().unwrap(), Variant::Atomic);
    /// assert_eq!("antichess".parse::<Variant>().unwrap(), Variant::Anti);
    /// assert!("fog".parse::<Variant>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chess" | "standard" => Ok(Variant::Standard),
            "giveaway" | "antichess" | "anti" => Ok(Variant::Anti),
            "atomic" => Ok(Variant::Atomic),
            "crazyhouse" | "house" => Ok(Variant::Crazyhouse),
            "horde" => Ok(Variant::Horde),
            "losers" => Ok(Variant::Losers),
            "racingkings" | "race" => Ok(Variant::Race),
            "relay" => Ok(Variant::Relay),
            _ => Err(ParseVariantError::UnknownVariant(s.to_string())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseVariantError {
    #[error("Unknown variant name: '{0}'")]
    UnknownVariant(String),
}
