//! Integration tests checking reflection and continuity of bounded curves.
#[cfg(test)]
mod tests {
    use hilbrick::{Hilbert, error};

    fn curve_reflects(h: &Hilbert) {
        for off in 0..h.length() {
            let pt = h.point(off);
            let off2 = h.index(&pt).expect("point inside cube");
            assert_eq!(off2, off, "curve does not reflect: {off} -> {pt:?} -> {off2}");
        }
    }

    fn curve_continuous(h: &Hilbert) {
        for off in 1..h.length() {
            let pt1 = h.point(off);
            let pt2 = h.point(off - 1);
            assert_eq!(
                pt1.manhattan(&pt2),
                1,
                "curve is discontinuous at offset {}: {:?} -> {:?}",
                off - 1,
                pt2,
                pt1
            );
        }
    }

    fn curve_fills_cube(h: &Hilbert) {
        let side = h.side();
        let mut seen = std::collections::HashSet::new();
        for pt in h.points() {
            assert!(pt.iter().all(|&c| c < side), "{pt:?} outside cube");
            assert!(seen.insert(pt));
        }
        assert_eq!(seen.len() as u64, h.length());
    }

    macro_rules! curve_tests {
        ($(($dims:expr, $size:expr)),* $(,)?) => {
            $(
                paste::paste! {
                    #[test]
                    fn [<hilbert_reflection_ $dims d_ $size>]() -> error::Result<()> {
                        curve_reflects(&Hilbert::from_dimensions($dims, $size)?);
                        Ok(())
                    }

                    #[test]
                    fn [<hilbert_continuous_ $dims d_ $size>]() -> error::Result<()> {
                        curve_continuous(&Hilbert::from_dimensions($dims, $size)?);
                        Ok(())
                    }

                    #[test]
                    fn [<hilbert_fills_ $dims d_ $size>]() -> error::Result<()> {
                        curve_fills_cube(&Hilbert::from_dimensions($dims, $size)?);
                        Ok(())
                    }
                }
            )*
        };
    }

    curve_tests! {
        (1, 64),
        (2, 4),
        (2, 32),
        (3, 4),
        (3, 8),
        (4, 4),
        (5, 2),
        (6, 4),
    }
}
