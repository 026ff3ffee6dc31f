//! Enum domains and their display metadata.
//!
//! Each domain is declared once through `display_enum!`, which generates the
//! enum, its wire strings and its display table together. A value that can be
//! validated always has a row to render.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Presentation metadata bound to one enum value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayOption {
    pub value: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
}

/// Look up the display row for a raw value.
pub fn find_option(table: &'static [DisplayOption], value: &str) -> Option<&'static DisplayOption> {
    table.iter().find(|option| option.value == value)
}

macro_rules! display_enum {
    (
        $(#[$meta:meta])*
        $name:ident, table = $table:ident {
            $(
                $variant:ident => ($value:literal, $label:literal, $color:literal, $bg:literal, $icon:literal)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        /// Display table, in declaration order.
        pub static $table: &[DisplayOption] = &[
            $(
                DisplayOption {
                    value: $value,
                    label: $label,
                    color: Some($color),
                    bg_color: Some($bg),
                    icon: Some($icon),
                },
            )+
        ];

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            /// Wire values, used as the `one_of` domain in field rules.
            pub fn values() -> Vec<String> {
                Self::ALL.iter().map(|v| v.as_str().to_string()).collect()
            }

            pub fn option(&self) -> &'static DisplayOption {
                &$table[*self as usize]
            }

            pub fn label(&self) -> &'static str {
                self.option().label
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(format!("unknown {} value: {}", stringify!($name), other)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

display_enum! {
    /// How serious an incident is.
    Severity, table = SEVERITY_LEVELS {
        Low => ("low", "Low", "#10B981", "#D1FAE5", "arrow-down"),
        Medium => ("medium", "Medium", "#F59E0B", "#FEF3C7", "minus"),
        High => ("high", "High", "#EF4444", "#FEE2E2", "arrow-up"),
        Critical => ("critical", "Critical", "#991B1B", "#FECACA", "alert-triangle"),
    }
}

display_enum! {
    /// Lifecycle state of a logged incident.
    IncidentStatus, table = STATUS_LEVELS {
        Open => ("open", "Open", "#3B82F6", "#DBEAFE", "circle"),
        InProgress => ("in_progress", "In Progress", "#F59E0B", "#FEF3C7", "clock"),
        Resolved => ("resolved", "Resolved", "#10B981", "#D1FAE5", "check-circle"),
        Closed => ("closed", "Closed", "#6B7280", "#F3F4F6", "x-circle"),
    }
}

display_enum! {
    /// Category of an incident.
    IncidentType, table = INCIDENT_TYPE_OPTIONS {
        Security => ("security", "Security", "#6366F1", "#E0E7FF", "shield"),
        Safety => ("safety", "Safety", "#F59E0B", "#FEF3C7", "hard-hat"),
        Maintenance => ("maintenance", "Maintenance", "#0EA5E9", "#E0F2FE", "wrench"),
        Medical => ("medical", "Medical", "#EF4444", "#FEE2E2", "heart-pulse"),
        Fire => ("fire", "Fire", "#DC2626", "#FEE2E2", "flame"),
        Theft => ("theft", "Theft", "#8B5CF6", "#EDE9FE", "package-x"),
        Other => ("other", "Other", "#6B7280", "#F3F4F6", "help-circle"),
    }
}
