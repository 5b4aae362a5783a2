//! Word scoring from tile values and bonus cells

use super::board::Board;

/// Score the word currently on the board.
///
/// Sums the values of all placed tiles, then applies a ×2 multiplier for
/// every occupied bonus cell. Multipliers compound and the result
/// saturates at `u32::MAX` on very wide boards.
pub fn score(board: &Board) -> u32 {
    let (sum, multiplier) = board
        .occupied()
        .fold((0u32, 1u32), |(sum, mult), (cell, tile)| {
            let mult = if cell.is_bonus() {
                mult.saturating_mul(2)
            } else {
                mult
            };
            (sum.saturating_add(tile.value()), mult)
        });
    sum.saturating_mul(multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Tile, TileId};
    use rstest::rstest;

    fn board_with(bonus: &[usize], placed: &[(usize, u32)]) -> Board {
        let mut board = Board::new(7, bonus);
        for (i, (cell, value)) in placed.iter().enumerate() {
            board
                .place_tile(*cell, Tile::new(TileId(i as u64), 'A', *value))
                .unwrap();
        }
        board
    }

    #[rstest]
    #[case::empty_board(&[], 0)]
    #[case::no_bonus(&[(0, 3), (2, 1)], 4)]
    #[case::one_bonus(&[(0, 3), (1, 1)], 8)]
    #[case::two_bonus(&[(1, 1), (3, 1), (5, 2)], 16)]
    #[case::blank_on_bonus(&[(1, 0), (2, 4)], 8)]
    fn test_score(#[case] placed: &[(usize, u32)], #[case] expected: u32) {
        let board = board_with(&[1, 5], placed);
        assert_eq!(score(&board), expected);
    }

    #[test]
    fn test_empty_bonus_cells_do_not_multiply() {
        let board = board_with(&[1, 5], &[(0, 2), (2, 2)]);
        assert_eq!(score(&board), 4);
    }

    #[test]
    fn test_many_bonus_cells_saturate() {
        let bonus: Vec<usize> = (0..40).collect();
        let mut board = Board::new(40, &bonus);
        for cell in 0..40 {
            board
                .place_tile(cell, Tile::new(TileId(cell as u64), 'A', 1))
                .unwrap();
        }
        assert_eq!(score(&board), u32::MAX);
    }
}
