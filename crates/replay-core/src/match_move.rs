use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One accepted move from a match's move log.
///
/// Square-to-square games fill `from_square`/`to_square` (and optionally
/// `promotion_piece`); drop games put the column index in `to_square`.
/// `move_notation` is the human-readable form the match service recorded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMove {
    #[serde(default)]
    pub id: Option<i64>,
    pub player_index: u8,
    #[serde(default)]
    pub move_notation: Option<String>,
    #[serde(default)]
    pub created: Option<NaiveDateTime>,
    #[serde(default)]
    pub from_square: Option<String>,
    #[serde(default)]
    pub to_square: Option<String>,
    #[serde(default)]
    pub promotion_piece: Option<String>,
}

impl MatchMove {
    /// Coordinate move, e.g. `MatchMove::squares(0, "e2", "e4")`.
    pub fn squares(player_index: u8, from: &str, to: &str) -> Self {
        Self {
            player_index,
            from_square: Some(from.to_string()),
            to_square: Some(to.to_string()),
            ..Self::default()
        }
    }

    /// Move recorded only by its notation.
    pub fn notation(player_index: u8, notation: &str) -> Self {
        Self {
            player_index,
            move_notation: Some(notation.to_string()),
            ..Self::default()
        }
    }

    /// Drop move into `column`.
    pub fn column(player_index: u8, column: usize) -> Self {
        Self {
            player_index,
            to_square: Some(column.to_string()),
            move_notation: Some(column.to_string()),
            ..Self::default()
        }
    }

    pub fn with_promotion(mut self, piece: &str) -> Self {
        self.promotion_piece = Some(piece.to_string());
        self
    }

    /// Parse a legal-move style encoding (`"e2e4"`, `"e7e8q"`) into a
    /// coordinate move. Anything else is kept as notation only.
    pub fn from_encoding(player_index: u8, encoding: &str) -> Self {
        let encoding = encoding.trim();
        if is_coordinate_encoding(encoding) {
            let mut mv = Self::squares(player_index, &encoding[0..2], &encoding[2..4]);
            if encoding.len() == 5 {
                mv.promotion_piece = Some(encoding[4..].to_string());
            }
            mv.move_notation = Some(encoding.to_string());
            mv
        } else {
            Self::notation(player_index, encoding)
        }
    }
}

fn is_coordinate_encoding(encoding: &str) -> bool {
    let bytes = encoding.as_bytes();
    let square = |file: u8, rank: u8| (b'a'..=b'h').contains(&file) && (b'1'..=b'8').contains(&rank);
    match bytes.len() {
        4 | 5 => {
            square(bytes[0], bytes[1])
                && square(bytes[2], bytes[3])
                && bytes.get(4).map_or(true, |p| b"qrbn".contains(p))
        }
        _ => false,
    }
}

/// Trimmed field value; blank strings count as absent.
pub(crate) fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
