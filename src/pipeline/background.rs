use image::RgbaImage;
use std::collections::VecDeque;

/// Makes the background transparent by flood filling from the top-left pixel.
///
/// Only pixels 4-connected to (0,0) through neighbours whose RGB distance
/// (sum of absolute channel differences) to the (0,0) colour is within
/// `tolerance` are cleared. Only alpha is touched. Returns the number of
/// pixels cleared.
pub fn remove_background(image: &mut RgbaImage, tolerance: u8) -> usize {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return 0;
    }

    let [bg_r, bg_g, bg_b, _] = image.get_pixel(0, 0).0;
    let tolerance = tolerance as u32;
    let matches = |px: [u8; 4]| {
        let diff = px[0].abs_diff(bg_r) as u32
            + px[1].abs_diff(bg_g) as u32
            + px[2].abs_diff(bg_b) as u32;
        diff <= tolerance
    };

    let mut visited = vec![false; width as usize * height as usize];
    let mut queue = VecDeque::new();
    visited[0] = true;
    queue.push_back((0u32, 0u32));
    let mut cleared = 0;

    while let Some((x, y)) = queue.pop_front() {
        image.get_pixel_mut(x, y).0[3] = 0;
        cleared += 1;

        let neighbors = [
            (x.checked_sub(1), Some(y)),
            (Some(x + 1).filter(|&nx| nx < width), Some(y)),
            (Some(x), y.checked_sub(1)),
            (Some(x), Some(y + 1).filter(|&ny| ny < height)),
        ];

        for (nx, ny) in neighbors {
            let (Some(nx), Some(ny)) = (nx, ny) else {
                continue;
            };

            let idx = ny as usize * width as usize + nx as usize;
            if visited[idx] {
                continue;
            }

            if matches(image.get_pixel(nx, ny).0) {
                visited[idx] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    cleared
}
