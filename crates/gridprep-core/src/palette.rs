/// Qualitative colours for chart traces, assigned by column position so the same table
/// always renders with the same colours.
pub const PALETTE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

pub fn color_for_column(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_cycle_by_position() {
        assert_eq!(color_for_column(0), "#636EFA");
        assert_eq!(color_for_column(PALETTE.len()), color_for_column(0));
        assert_ne!(color_for_column(1), color_for_column(0));
    }
}
