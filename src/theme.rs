//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Number of distinct tile colours (2, 4, 8, ... 2048); higher values reuse
/// the last entry.
pub const TILE_RAMP_LEN: usize = 11;

/// Colours for the board and the tile value ramp, loadable from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Tile colours indexed by log2(value) - 1: tiles[0] is the 2-tile.
    pub tiles: [Color; TILE_RAMP_LEN],
    /// Board background (behind the cells).
    pub board_bg: Color,
    /// Empty cell fill.
    pub empty_cell: Color,
    /// Text on tiles.
    pub tile_fg: Color,
    /// Text (score, help).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::slate_default()
    }
}

impl Theme {
    /// Hardcoded defaults: slate board with the classic orange/red/gold ramp.
    pub fn slate_default() -> Self {
        Self {
            tiles: [
                parse_hex("#334155").unwrap(), // 2
                parse_hex("#475569").unwrap(), // 4
                parse_hex("#F97316").unwrap(), // 8
                parse_hex("#EA580C").unwrap(), // 16
                parse_hex("#EF4444").unwrap(), // 32
                parse_hex("#DC2626").unwrap(), // 64
                parse_hex("#EAB308").unwrap(), // 128
                parse_hex("#CA8A04").unwrap(), // 256
                parse_hex("#A16207").unwrap(), // 512
                parse_hex("#854D0E").unwrap(), // 1024
                parse_hex("#3B82F6").unwrap(), // 2048+
            ],
            board_bg: parse_hex("#0F172A").unwrap(),
            empty_cell: parse_hex("#1E293B").unwrap(),
            tile_fg: parse_hex("#F8FAFC").unwrap(),
            main_fg: parse_hex("#ABB2BF").unwrap(),
            title: parse_hex("#E5C07B").unwrap(),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or
    /// `theme[key]='value'`. Keys: `tile_2` .. `tile_2048`, `board_bg`,
    /// `empty_cell`, `tile_fg`, `main_fg`, `title`. Falls back to defaults
    /// if path is None or the file is missing/invalid.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => {
                let mut t = Self::slate_default();
                t.apply_palette(palette);
                return Ok(t);
            }
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Override the tile ramp for high-contrast or colourblind viewing.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.tiles = [
                    parse_hex("#404040").unwrap(),
                    parse_hex("#707070").unwrap(),
                    parse_hex("#FF8800").unwrap(),
                    parse_hex("#FF4400").unwrap(),
                    parse_hex("#FF0000").unwrap(),
                    parse_hex("#CC0000").unwrap(),
                    parse_hex("#FFFF00").unwrap(),
                    parse_hex("#CCCC00").unwrap(),
                    parse_hex("#00FF00").unwrap(),
                    parse_hex("#00FFFF").unwrap(),
                    parse_hex("#0088FF").unwrap(),
                ];
            }
            crate::Palette::Colorblind => {
                // Okabe-Ito style progression; avoids red/green alone.
                self.tiles = [
                    parse_hex("#334155").unwrap(),
                    parse_hex("#475569").unwrap(),
                    parse_hex("#0077BB").unwrap(),
                    parse_hex("#33BBEE").unwrap(),
                    parse_hex("#009988").unwrap(),
                    parse_hex("#EE7733").unwrap(),
                    parse_hex("#CC3311").unwrap(),
                    parse_hex("#EE3377").unwrap(),
                    parse_hex("#BBBB00").unwrap(),
                    parse_hex("#AA4499").unwrap(),
                    parse_hex("#DDDDDD").unwrap(),
                ];
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let defaults = Self::slate_default();
        let get = |key: &str, fallback: Color| {
            map.get(key)
                .and_then(|v| parse_hex(v.trim_matches('"').trim_matches('\'').trim()).ok())
                .unwrap_or(fallback)
        };
        let mut tiles = defaults.tiles;
        for (i, slot) in tiles.iter_mut().enumerate() {
            let key = format!("tile_{}", 2u32 << i);
            *slot = get(&key, *slot);
        }
        Self {
            tiles,
            board_bg: get("board_bg", defaults.board_bg),
            empty_cell: get("empty_cell", defaults.empty_cell),
            tile_fg: get("tile_fg", defaults.tile_fg),
            main_fg: get("main_fg", defaults.main_fg),
            title: get("title", defaults.title),
        }
    }

    /// Colour for a tile value. Values beyond 2048 reuse the last ramp entry.
    pub fn tile_color(&self, value: u32) -> Color {
        if value < 2 {
            return self.empty_cell;
        }
        let index = (value.ilog2() as usize).saturating_sub(1);
        self.tiles[index.min(TILE_RAMP_LEN - 1)]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let (r, g, b) = if s.len() == 6 {
        let r =
            u8::from_str_radix(&s[0..2], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        let g =
            u8::from_str_radix(&s[2..4], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        let b =
            u8::from_str_radix(&s[4..6], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        (r, g, b)
    } else if s.len() == 3 {
        let r = u8::from_str_radix(&s[0..1], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        let g = u8::from_str_radix(&s[1..2], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        let b = u8::from_str_radix(&s[2..3], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        (r, g, b)
    } else {
        return Err(ThemeError::InvalidHex(s.to_string()));
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#F97316").unwrap();
        assert!(matches!(c, Color::Rgb(0xF9, 0x73, 0x16)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[board_bg]="#0F172A""##);
        assert_eq!(map.get("board_bg"), Some(&"#0F172A".to_string()));
    }

    #[test]
    fn test_tile_color_ramp() {
        let theme = Theme::slate_default();
        assert_eq!(theme.tile_color(2), theme.tiles[0]);
        assert_eq!(theme.tile_color(2048), theme.tiles[10]);
        // Past the ramp, the last colour is reused.
        assert_eq!(theme.tile_color(8192), theme.tiles[10]);
    }
}
