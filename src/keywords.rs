//! Keyword sources for a harvest run.

use std::path::Path;

use anyhow::{Context, Result, bail};

/// Built-in keyword list: human/humanoid anime characters across genres,
/// genders, and occupations. Used when no keyword file is given.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    // Anime maid characters
    "Misaki Ayuzawa Maid Sama anime",
    "Lilia Greyrat Mushoku Tensei anime",
    "Rem Re:Zero anime maid",
    "Ram Re:Zero anime maid",
    "Entoma Vasilissa Zeta Overlord anime",
    "Mey-Rin Black Butler anime",
    "Roberta Black Lagoon anime",
    "Virgo Fairy Tail anime maid",
    "Tohru Miss Kobayashi Dragon Maid anime",
    "Sakura Nekomi anime maid",
    "Ai Hayasaka Kaguya-sama anime",
    "Nagomi Wahira Akiba Maid War anime",
    "Faris Nyannyan Steins Gate anime",
    "Sena Kashiwazaki Haganai anime",
    "Hilda Beelzebub anime",
    "Narberal Gamma Overlord anime",
    "Ryuuou no Oshigoto anime maid",
    "Chihiro Komiya anime maid",
    "Siesta Tantei wa Mou Shindeiru anime",
    "Lilith anime maid mysterious",
    "Hinata Kaho Blend S anime",
    "Myucel Foaran Outbreak Company anime",
    "Sadayo Kawakami Persona 5 anime",
    "Erika Ono anime maid",
    "Maika Sakuranomiya Blend S anime",
    "Maria Hayate no Gotoku anime",
    "Otae Shimura Gintama anime",
    "Mariel Hanasato anime maid",
    "Hannah Annafellows Black Butler anime",
    "Kotori Minami Love Live anime",
    // Attack on Titan
    "attack on titan eren yeager",
    "attack on titan mikasa ackerman",
    "attack on titan levi ackerman",
    "attack on titan armin arlert",
    "attack on titan historia reiss",
    "shingeki no kyojin character",
    // Demon Slayer
    "demon slayer tanjiro kamado",
    "demon slayer nezuko kamado",
    "demon slayer zenitsu agatsuma",
    "demon slayer shinobu kocho",
    "demon slayer mitsuri kanroji",
    "kimetsu no yaiba character",
    // Classics
    "sailor moon anime character",
    "one piece luffy anime",
    "naruto anime character",
    "bleach anime character",
    // Cute anime girls
    "cute anime girl illustration",
    "kawaii anime girl portrait",
    "anime girl summer hat",
    "anime girl school uniform",
    "anime girl idol",
    // Other popular series
    "spy x family anya anime",
    "spy x family yor anime",
    "frieren anime character",
    "jujutsu kaisen character",
    "my hero academia character",
];

/// Load keywords from a plain-text file: one search term per line, blank
/// lines and `#` comments skipped.
pub fn load_keyword_file(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read keyword file: {}", path.display()))?;

    let keywords: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect();

    if keywords.is_empty() {
        bail!("Keyword file {} contains no keywords", path.display());
    }

    Ok(keywords)
}
