//! Team logo asset lookup.

/// CDN logo URLs keyed by team abbreviation. Unknown abbreviations yield no
/// image rather than an error.
const TEAM_LOGOS: &[(&str, &str)] = &[
    ("ATL", "https://cdn.nba.com/logos/nba/1610612737/global/L/logo.svg"),
    ("BOS", "https://cdn.nba.com/logos/nba/1610612738/global/L/logo.svg"),
    ("CHA", "https://cdn.nba.com/logos/nba/1610612766/global/L/logo.svg"),
    ("CHI", "https://cdn.nba.com/logos/nba/1610612741/global/L/logo.svg"),
    ("CLE", "https://cdn.nba.com/logos/nba/1610612739/global/L/logo.svg"),
    ("GSW", "https://cdn.nba.com/logos/nba/1610612744/global/L/logo.svg"),
    ("LAL", "https://cdn.nba.com/logos/nba/1610612747/global/L/logo.svg"),
    ("MIA", "https://cdn.nba.com/logos/nba/1610612748/global/L/logo.svg"),
    ("MIL", "https://cdn.nba.com/logos/nba/1610612749/global/L/logo.svg"),
    ("NYK", "https://cdn.nba.com/logos/nba/1610612752/global/L/logo.svg"),
    ("PHI", "https://cdn.nba.com/logos/nba/1610612755/global/L/logo.svg"),
    ("PHX", "https://cdn.nba.com/logos/nba/1610612756/global/L/logo.svg"),
];

pub fn logo_url(team: &str) -> Option<&'static str> {
    TEAM_LOGOS
        .iter()
        .find(|(abbreviation, _)| *abbreviation == team)
        .map(|(_, url)| *url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_team_resolves() {
        let url = logo_url("BOS").unwrap();
        assert!(url.contains("1610612738"));
    }

    #[test]
    fn unknown_team_yields_nothing() {
        assert_eq!(None, logo_url("SEA"));
        assert_eq!(None, logo_url(""));
    }
}
