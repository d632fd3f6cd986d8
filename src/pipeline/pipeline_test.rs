// End-to-end checks: sprite sheet in, decodable cursors out.

#[cfg(test)]
mod tests {
    use crate::model::{GridSpec, Hotspot, RemovalConfig};
    use crate::pipeline::export::{ExportOptions, write_artifacts};
    use crate::pipeline::{SplitOptions, cur, process, split_file};
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    const BG: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const INK: Rgba<u8> = Rgba([20, 20, 20, 255]);

    /// 4x4 sheet of 16x16 cells: green background, a dark square outline in
    /// each cell with green left inside it.
    fn sprite_sheet() -> RgbaImage {
        RgbaImage::from_fn(64, 64, |x, y| {
            let (cx, cy) = (x % 16, y % 16);
            let on_outline = (4..=11).contains(&cx)
                && (4..=11).contains(&cy)
                && (cx == 4 || cx == 11 || cy == 4 || cy == 11);
            if on_outline { INK } else { BG }
        })
    }

    #[test]
    fn test_sheet_to_cursors_round_trip() {
        let source = sprite_sheet();
        let artifacts = process(&source, GridSpec::new(4, 4), RemovalConfig::enabled(10)).unwrap();
        assert_eq!(artifacts.len(), 16);

        for artifact in &artifacts {
            let decoded = cur::decode(artifact.payload()).unwrap();
            assert_eq!(decoded.image.dimensions(), (16, 16));
            assert_eq!(decoded.hotspot, artifact.hotspot());
            assert_eq!(decoded.image, *artifact.image());
            assert!(decoded.mask_is_clear());

            // outside the outline cleared, outline and enclosed green kept
            assert_eq!(decoded.image.get_pixel(0, 0)[3], 0);
            assert_eq!(decoded.image.get_pixel(15, 15)[3], 0);
            assert_eq!(decoded.image.get_pixel(4, 4)[3], 255);
            assert_eq!(decoded.image.get_pixel(8, 8), &BG);
        }

        assert_eq!(artifacts[5].hotspot(), Hotspot::new(8, 8));
        assert!(artifacts.iter().filter(|a| a.index != 6).all(|a| a.hotspot() == Hotspot::default()));
    }

    #[test]
    fn test_data_size_and_offset_fields() {
        let source = RgbaImage::from_pixel(400, 400, INK);
        let artifacts = process(&source, GridSpec::new(3, 3), RemovalConfig::default()).unwrap();

        for artifact in &artifacts {
            let data = artifact.payload();
            let size = u32::from_le_bytes([data[14], data[15], data[16], data[17]]) as usize;
            let offset = u32::from_le_bytes([data[18], data[19], data[20], data[21]]);

            assert_eq!(data[6], 133);
            assert_eq!(size, 40 + 133 * 133 * 4 + 20 * 133);
            assert_eq!(offset, 22);
            assert_eq!(data.len(), 22 + size);
        }
    }

    #[test]
    fn test_hotspot_edit_survives_export() {
        let dir = tempdir().unwrap();
        let mut artifacts =
            process(&sprite_sheet(), GridSpec::new(2, 2), RemovalConfig::default()).unwrap();
        artifacts[0].set_hotspot(Hotspot::new(31, 0)).unwrap();

        write_artifacts(&artifacts, dir.path(), &ExportOptions::default()).unwrap();

        let data = std::fs::read(dir.path().join("cursor_01.cur")).unwrap();
        let decoded = cur::decode(&data).unwrap();
        assert_eq!(decoded.hotspot, Hotspot::new(31, 0));
        assert_eq!(decoded.image, *artifacts[0].image());
    }

    #[test]
    fn test_split_file_from_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.png");
        sprite_sheet().save(&path).unwrap();

        let options = SplitOptions::new(GridSpec::new(4, 4)).with_removal(RemovalConfig::enabled(0));
        let artifacts = split_file(&path, &options).unwrap();

        assert_eq!(artifacts.len(), 16);
        assert_eq!(artifacts[15].filename, "cursor_16.cur");
        assert_eq!(artifacts[15].image().get_pixel(0, 0)[3], 0);
    }
}
