//! Fixed "explore further" reference links, shown when the resource
//! heuristic fires on an utterance.

pub fn reference_links(country: &str) -> Vec<(String, &'static str)> {
    vec![
        (
            format!("U.S. International Trade Commission on trade with {}", country),
            "https://www.usitc.gov/",
        ),
        (
            "Bureau of Economic Analysis (BEA)".to_string(),
            "https://www.bea.gov/",
        ),
        (
            "Congressional Research Service Reports on Trade".to_string(),
            "https://crsreports.congress.gov/",
        ),
        (
            "World Trade Organization (WTO)".to_string(),
            "https://www.wto.org/",
        ),
    ]
}
