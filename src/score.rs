/// Points for dropping `piece` on `level`. Ground placements are always worth nothing, so the only
/// way to score is to stack, and heavier pieces stacked higher pay off the most.
#[inline]
pub const fn score(piece: u8, level: u8) -> u32 {
    piece as u32 * level as u32
}
