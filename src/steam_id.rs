/// Pulls the numeric Steam ID out of free-form input: a bare id, or a pasted
/// profile URL such as `https://steamcommunity.com/profiles/7656.../`.
/// The first run of ASCII digits wins.
pub fn extract_steam_id(entry: &str) -> Option<String> {
    let start = entry.find(|c: char| c.is_ascii_digit())?;
    let digits: String = entry[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    Some(digits)
}
