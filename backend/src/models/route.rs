//! Transit routes used to group lots for aggregate reporting.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::lot::LocalizedText;

/// Canonical route a lot belongs to.
///
/// Raw sheet codes resolve through [`Route::from_code`]; unknown codes land in
/// [`Route::Other`] so that no lot is ever dropped for a bad route cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Route {
    Thoothukudi,
    Tirunelveli,
    Nagercoil,
    #[serde(rename = "VIP")]
    Vip,
    Other,
}

impl Route {
    /// Routes that get summaries and overall-history series, in display order.
    pub const TRANSIT: [Route; 3] = [Route::Thoothukudi, Route::Tirunelveli, Route::Nagercoil];

    /// Resolve a raw route code. Matching is trim + case-insensitive.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "TUT" => Route::Thoothukudi,
            "TIN" => Route::Tirunelveli,
            "NGL" => Route::Nagercoil,
            "VIP" => Route::Vip,
            _ => Route::Other,
        }
    }

    pub fn is_transit(&self) -> bool {
        Self::TRANSIT.contains(self)
    }

    /// English display name.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Thoothukudi => "Thoothukudi",
            Route::Tirunelveli => "Tirunelveli",
            Route::Nagercoil => "Nagercoil",
            Route::Vip => "VIP",
            Route::Other => "Other",
        }
    }

    /// Tamil display name.
    pub fn name_ta(&self) -> &'static str {
        match self {
            Route::Thoothukudi => "தூத்துக்குடி",
            Route::Tirunelveli => "திருநெல்வேலி",
            Route::Nagercoil => "நாகர்கோவில்",
            Route::Vip => "விஐபி",
            Route::Other => "மற்றவை",
        }
    }

    pub fn localized_name(&self) -> LocalizedText {
        LocalizedText::from_pairs([("en", self.name()), ("ta", self.name_ta())])
    }

    /// Line colour used by the overall-history chart.
    pub fn chart_color(&self) -> &'static str {
        match self {
            Route::Thoothukudi => "#E91E63",
            Route::Tirunelveli => "#00BCD4",
            Route::Nagercoil => "#FF9800",
            Route::Vip => "#9C27B0",
            Route::Other => "#9E9E9E",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(Route::from_code("TUT"), Route::Thoothukudi);
        assert_eq!(Route::from_code(" tin "), Route::Tirunelveli);
        assert_eq!(Route::from_code("Ngl"), Route::Nagercoil);
        assert_eq!(Route::from_code("vip"), Route::Vip);
    }

    #[test]
    fn test_unknown_codes_map_to_other() {
        assert_eq!(Route::from_code(""), Route::Other);
        assert_eq!(Route::from_code("XYZ"), Route::Other);
        assert_eq!(Route::from_code("Thoothukudi"), Route::Other);
    }

    #[test]
    fn test_transit_membership() {
        assert!(Route::Nagercoil.is_transit());
        assert!(!Route::Vip.is_transit());
        assert!(!Route::Other.is_transit());
    }

    #[test]
    fn test_serializes_as_display_name() {
        assert_eq!(serde_json::to_string(&Route::Vip).unwrap(), "\"VIP\"");
        assert_eq!(serde_json::to_string(&Route::Tirunelveli).unwrap(), "\"Tirunelveli\"");
    }
}
