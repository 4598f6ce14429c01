use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PositionGroup {
    Goalkeeper,
    CenterBack,
    Fullback,
    Midfielder,
    Forward,
    Outfield,
}

/// Position-code tokens per group, checked in order; the first group with a token
/// contained in the (upper-cased) position code wins.
pub const POSITION_TOKENS: &[(PositionGroup, &[&str])] = &[
    (PositionGroup::Goalkeeper, &["GK"]),
    (PositionGroup::CenterBack, &["CB", "LCB", "RCB"]),
    (PositionGroup::Fullback, &["RB", "LB", "RWB", "LWB", "WB"]),
    (PositionGroup::Forward, &["CF", "ST", "LW", "RW", "RWF", "LWF"]),
    (
        PositionGroup::Midfielder,
        &[
            "MF", "CM", "DM", "AM", "RCMF", "LCMF", "RDMF", "LDMF", "RAMF", "LAMF", "CAM", "CDM",
        ],
    ),
];

impl PositionGroup {
    pub fn from_position(position: Option<&str>) -> Self {
        let Some(raw) = position else {
            return PositionGroup::Outfield;
        };
        let code = raw.trim().to_uppercase();
        if code.is_empty() {
            return PositionGroup::Outfield;
        }
        POSITION_TOKENS
            .iter()
            .find(|(_, tokens)| tokens.iter().any(|token| code.contains(token)))
            .map(|(group, _)| *group)
            .unwrap_or(PositionGroup::Outfield)
    }

    pub fn label(self) -> &'static str {
        match self {
            PositionGroup::Goalkeeper => "Goalkeeper",
            PositionGroup::CenterBack => "Center-back",
            PositionGroup::Fullback => "Fullback/Wingback",
            PositionGroup::Midfielder => "Midfielder",
            PositionGroup::Forward => "Forward",
            PositionGroup::Outfield => "Outfield",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_wyscout_codes() {
        assert_eq!(PositionGroup::from_position(Some("gk")), PositionGroup::Goalkeeper);
        assert_eq!(PositionGroup::from_position(Some("LCB")), PositionGroup::CenterBack);
        assert_eq!(PositionGroup::from_position(Some("RWB")), PositionGroup::Fullback);
        assert_eq!(PositionGroup::from_position(Some("LWF")), PositionGroup::Forward);
        assert_eq!(PositionGroup::from_position(Some("RDMF")), PositionGroup::Midfielder);
    }

    #[test]
    fn first_matching_group_wins() {
        // "RCB, LB" holds tokens for both center-back and fullback.
        assert_eq!(
            PositionGroup::from_position(Some("RCB, LB")),
            PositionGroup::CenterBack
        );
        // "LWB" contains "LW" but fullbacks are checked before forwards.
        assert_eq!(PositionGroup::from_position(Some("LWB")), PositionGroup::Fullback);
    }

    #[test]
    fn unknown_or_missing_is_outfield() {
        assert_eq!(PositionGroup::from_position(None), PositionGroup::Outfield);
        assert_eq!(PositionGroup::from_position(Some("  ")), PositionGroup::Outfield);
        assert_eq!(PositionGroup::from_position(Some("SUB")), PositionGroup::Outfield);
    }
}
