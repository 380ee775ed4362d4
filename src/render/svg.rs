//! SVG stencil rasterization using resvg/usvg.
//!
//! Vector stencils in an [`AssetCatalog`](crate::AssetCatalog) are rendered
//! once at their intrinsic size; the tint then only looks at the alpha.

use image::RgbaImage;
use resvg::tiny_skia::Transform;
use resvg::usvg::{Options, Tree};

use super::{new_pixmap, pixmap_to_rgba_image};
use crate::geometry::SizePx;

/// Renders SVG data at its intrinsic size (rounded up to whole pixels).
///
/// Returns a description of the problem if the data is not valid SVG or has
/// an empty canvas.
pub fn rasterize_svg(svg_data: &[u8]) -> Result<RgbaImage, String> {
    let opts = Options::default();
    let tree = Tree::from_data(svg_data, &opts).map_err(|e| e.to_string())?;

    let svg_size = tree.size();
    let size = SizePx::new(
        svg_size.width().ceil() as u32,
        svg_size.height().ceil() as u32,
    );
    let mut pixmap = new_pixmap(size).map_err(|e| e.to_string())?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISC_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="30"><circle cx="20" cy="15" r="10" fill="#000000"/></svg>"##;

    #[test]
    fn rasterize_at_intrinsic_size() {
        let img = rasterize_svg(DISC_SVG.as_bytes()).unwrap();

        assert_eq!(img.dimensions(), (40, 30));
        assert_eq!(img.get_pixel(20, 15)[3], 255, "disc is opaque");
        assert_eq!(img.get_pixel(0, 0)[3], 0, "background is transparent");
    }

    #[test]
    fn invalid_svg_is_an_error() {
        assert!(rasterize_svg(b"not svg at all").is_err());
    }
}
