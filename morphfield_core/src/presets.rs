// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in artwork for the stool-to-chair morph.
//!
//! The stool ships inline. The chair is served as an SVG document and
//! fetched by the host, so only its location and view box live here.

use kurbo::Size;

use crate::error::MorphError;
use crate::outline::Outline;

/// Path data of the stool silhouette, authored in [`STOOL_VIEW_BOX`].
pub const STOOL_PATH: &str = "M41.0019 29.0617C40.331 46.9069 39.6614 64.6496 38.9988 82.3925C38.7436 89.2276 38.5047 96.0633 38.256 102.899C38.2414 103.298 38.1959 103.697 38.1825 104.097C38.1616 104.723 37.8608 105.021 37.2159 104.999C36.154 104.963 35.0912 104.935 34.0288 104.932C33.0943 104.93 32.773 104.495 32.7702 103.575C32.755 98.6991 32.6915 93.8234 32.6424 88.9477C32.4538 70.2094 32.2111 51.4714 32.1195 32.7326C32.1009 28.9305 32.6075 25.1216 32.9699 21.3251C33.0593 20.3881 32.8649 20.0191 31.9326 19.8577C25.6984 18.7786 19.8576 16.6229 14.3952 13.4494C13.4713 12.9126 13.1024 13.0274 12.7714 14.054C12.4489 15.0539 12.1339 16.0822 12.0242 17.1197C10.8548 28.1879 9.71055 39.2588 8.59293 50.3323C7.70901 59.0902 6.86672 67.8523 6.02117 76.614C5.92746 77.5851 5.50877 78.2521 4.57322 78.5959C4.19695 78.7342 3.84237 78.9308 3.47835 79.1017C1.23477 80.1554 -0.153361 79.2391 0.0135462 76.803C0.384102 71.3946 0.768311 65.987 1.13654 60.5784C2.03855 47.3295 2.90499 34.0782 3.85834 20.8329C4.04764 18.2028 4.01504 15.5164 5.10658 13.004C5.80799 11.3895 6.91909 10.1287 8.16773 8.9277C8.52849 8.5807 8.77293 7.97365 8.81052 7.4668C8.87996 6.53047 8.78913 5.57731 8.7064 4.63625C8.60033 3.42979 9.14261 2.65261 10.2655 2.33075C12.1586 1.78815 14.0459 1.08304 15.9833 0.865953C19.7634 0.442401 23.5731 0.169825 27.3763 0.0819322C37.3838 -0.149345 47.3887 0.0887025 57.3536 1.05671C61.8628 1.49472 66.338 2.29983 70.8156 3.01812C71.8486 3.18383 72.8294 3.67348 73.8322 4.01959C74.7683 4.34265 75.3133 5.0156 75.2891 5.98327C75.2601 7.13655 75.0534 8.28481 75.0057 9.43858C74.9898 9.82357 75.1031 10.4197 75.3664 10.5793C79.3427 12.99 80.9738 16.6408 81.1779 21.0974C81.7705 34.0362 82.3745 46.9745 82.9755 59.9129C83.2996 66.891 83.6364 73.8685 83.942 80.8473C83.9868 81.8693 84.2663 83.0556 83.0233 83.6417C81.7494 84.2423 80.6972 83.6304 79.6823 82.897C78.9164 82.3437 78.5653 81.6471 78.498 80.6938C77.6825 69.1536 76.8631 57.6136 75.9911 46.0775C75.2892 36.7922 74.5176 27.5121 73.7686 18.2304C73.638 16.6116 72.8984 15.2364 71.8965 13.9973C71.1578 13.0837 70.28 12.8882 69.2638 13.3949C64.315 15.8629 59.0248 17.3366 53.6616 18.53C50.3824 19.2597 47.0396 19.7192 43.7132 20.2204C42.7758 20.3616 42.3115 20.8552 42.1719 21.6557C41.7482 24.0842 41.3898 26.5238 41.0019 29.0617Z";

/// View box the stool was drawn in.
pub const STOOL_VIEW_BOX: Size = Size::new(84.0, 105.0);

/// View box of the chair document.
pub const CHAIR_VIEW_BOX: Size = Size::new(710.0, 1027.0);

/// Where the chair document is served from.
pub const CHAIR_URL: &str = "/chair3.svg";

/// Parses the built-in stool.
///
/// # Errors
///
/// Never fails for the shipped path data. The `Result` mirrors
/// [`Outline::new`].
pub fn stool() -> Result<Outline, MorphError> {
    Outline::new(STOOL_PATH, STOOL_VIEW_BOX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::Canvas;
    use crate::raster::rasterize;

    #[test]
    fn stool_parses_and_fills_the_artboard() {
        let stool = stool().unwrap();
        let fit = stool.fit(Canvas::STOOL).unwrap();
        let grid = rasterize(&stool, fit, Canvas::STOOL).unwrap();
        let area = grid.inside_count();
        assert!(
            (1_000..45_000).contains(&area),
            "stool covers {area} of {} pixels",
            Canvas::STOOL.len()
        );
    }
}
