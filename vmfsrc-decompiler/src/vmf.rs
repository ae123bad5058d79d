//! Interfaces to the collaborators that turn reconstructed geometry into
//! VMF text: the writer, the texture axis builder and the id allocator.

use na::Vector3;

use vmfsrc_bsp::data::BspData;

/// Receives the class/keyvalue structure of the VMF document.
pub trait VmfWriter {
    fn start(&mut self, class: &str);
    fn end(&mut self, class: &str);
    fn put(&mut self, key: &str, value: &str);

    fn put_int(&mut self, key: &str, value: i32) {
        self.put(key, &value.to_string());
    }

    /// Three points spanning a side's plane, in VMF notation.
    fn put_plane(&mut self, key: &str, e1: &Vector3<f32>, e2: &Vector3<f32>, e3: &Vector3<f32>) {
        self.put(
            key,
            &format!(
                "({} {} {}) ({} {} {}) ({} {} {})",
                e1.x, e1.y, e1.z, e2.x, e2.y, e2.z, e3.x, e3.y, e3.z
            ),
        );
    }

    fn put_texture(&mut self, texture: &Texture) {
        self.put("material", &texture.material);
        self.put("uaxis", &texture.uaxis.to_string());
        self.put("vaxis", &texture.vaxis.to_string());
    }
}

/// One texture axis in VMF notation: `[x y z shift] scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct TexAxis {
    pub axis: Vector3<f32>,
    pub shift: f32,
    pub scale: f32,
}

impl std::fmt::Display for TexAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} {} {} {}] {}",
            self.axis.x, self.axis.y, self.axis.z, self.shift, self.scale
        )
    }
}

/// The material and projection written for one side.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub material: String,
    pub uaxis: TexAxis,
    pub vaxis: TexAxis,
}

/// Everything the texture builder gets to work with for one side.
pub struct TextureRequest<'a> {
    pub texinfo: i32,
    pub brush: usize,
    pub brush_side: usize,
    pub normal: Vector3<f32>,
    pub origin: Option<&'a Vector3<f32>>,
    pub angles: Option<&'a Vector3<f32>>,
}

/// Produces the material name and texture axes for a side. The real
/// implementation inverts the compiled texinfo matrix; this crate only
/// consumes the result.
pub trait TextureAxisSource {
    fn build(&self, bsp: &BspData, request: &TextureRequest) -> Texture;
}

/// Fallback that projects along the normal's dominant axis and names a tool
/// texture, enough to produce loadable output without texture data.
pub struct DefaultTextureAxisSource;

impl TextureAxisSource for DefaultTextureAxisSource {
    fn build(&self, _bsp: &BspData, request: &TextureRequest) -> Texture {
        let n = &request.normal;

        let (u, v) = if n.z.abs() >= n.x.abs() && n.z.abs() >= n.y.abs() {
            (Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, -1.0, 0.0))
        } else if n.x.abs() >= n.y.abs() {
            (Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 0.0, -1.0))
        } else {
            (Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0))
        };

        Texture {
            material: "TOOLS/TOOLSNODRAW".to_string(),
            uaxis: TexAxis {
                axis: u,
                shift: 0.0,
                scale: 0.25,
            },
            vaxis: TexAxis {
                axis: v,
                shift: 0.0,
                scale: 0.25,
            },
        }
    }
}

/// Allocates the unique ids VMF elements carry.
pub trait UidSource {
    fn next_uid(&mut self) -> i32;
}

/// Counts up from 1, the way a fresh VMF document numbers its elements.
#[derive(Debug, Default)]
pub struct SequentialUids {
    next: i32,
}

impl SequentialUids {
    pub fn new() -> Self {
        SequentialUids { next: 0 }
    }
}

impl UidSource for SequentialUids {
    fn next_uid(&mut self) -> i32 {
        self.next += 1;
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tex_axis_formats_like_hammer() {
        let axis = TexAxis {
            axis: Vector3::new(0.0, -1.0, 0.0),
            shift: 16.0,
            scale: 0.25,
        };
        assert_eq!(axis.to_string(), "[0 -1 0 16] 0.25");
    }

    #[test]
    fn default_axes_are_perpendicular_to_each_other() {
        let source = DefaultTextureAxisSource;
        let bsp = BspData::default();

        for normal in [
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
        ] {
            let tex = source.build(
                &bsp,
                &TextureRequest {
                    texinfo: -1,
                    brush: 0,
                    brush_side: 0,
                    normal,
                    origin: None,
                    angles: None,
                },
            );
            assert_eq!(tex.uaxis.axis.dot(&tex.vaxis.axis), 0.0);
        }
    }

    #[test]
    fn uids_count_up_from_one() {
        let mut uids = SequentialUids::new();
        assert_eq!(uids.next_uid(), 1);
        assert_eq!(uids.next_uid(), 2);
    }
}
