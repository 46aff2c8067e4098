use glam::Vec2;
use miniquad::*;
use sash::{colors, palette::LinSrgba, Bitmap};

use crate::RenderingContext;

mod shader {
    use miniquad::*;

    pub const VERTEX: &str = r#"#version 100
    attribute vec2 vert_pos;

    varying lowp vec2 texcoord;

    void main() {
        gl_Position = vec4((vert_pos * 2.0 - 1.0) * vec2(1.0, -1.0), 0.0, 1.0);
        texcoord = vert_pos;
    }"#;

    pub const FRAGMENT: &str = r#"#version 100
    varying lowp vec2 texcoord;

    uniform sampler2D tex;

    void main() {
        gl_FragColor = texture2D(tex, texcoord);
    }"#;

    pub fn meta() -> ShaderMeta {
        ShaderMeta {
            images: vec!["tex".to_string()],
            uniforms: UniformBlockLayout {
                uniforms: Vec::new(),
            },
        }
    }

    pub fn attributes() -> [VertexAttribute; 1] {
        [VertexAttribute::new("vert_pos", VertexFormat::Float2)]
    }
}

/// CPU-side frame the size of the window. Widgets are composited into
/// `canvas` and the whole bitmap is uploaded and drawn as one quad.
pub struct Screen {
    canvas: Bitmap,
    background: LinSrgba,
    pipeline: Pipeline,
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    texture: TextureId,
    texture_size: (u32, u32),
}

impl Screen {
    fn create_texture(context: &mut RenderingContext, canvas: &Bitmap) -> TextureId {
        let texture = context.new_texture_from_rgba8(
            canvas.width().clamp(1, u16::MAX as u32) as u16,
            canvas.height().clamp(1, u16::MAX as u32) as u16,
            &Self::upload_bytes(canvas),
        );
        context.texture_set_filter(texture, FilterMode::Nearest, MipmapFilterMode::None);
        texture
    }
    fn upload_bytes(canvas: &Bitmap) -> Vec<u8> {
        if canvas.is_empty() {
            vec![0; 4]
        } else {
            canvas.to_rgba8()
        }
    }

    pub fn new(
        context: &mut RenderingContext,
        width: u32,
        height: u32,
    ) -> Result<Self, ShaderError> {
        let vertices: [Vec2; 4] = [
            Vec2 { x: 0., y: 0. },
            Vec2 { x: 1., y: 0. },
            Vec2 { x: 1., y: 1. },
            Vec2 { x: 0., y: 1. },
        ];
        let vertex_buffer = context.new_buffer(
            BufferType::VertexBuffer,
            BufferUsage::Immutable,
            BufferSource::slice(&vertices),
        );
        let indices: [u16; 6] = [0, 1, 2, 0, 2, 3];
        let index_buffer = context.new_buffer(
            BufferType::IndexBuffer,
            BufferUsage::Immutable,
            BufferSource::slice(&indices),
        );

        let shader = context.new_shader(
            ShaderSource::Glsl {
                vertex: shader::VERTEX,
                fragment: shader::FRAGMENT,
            },
            shader::meta(),
        )?;
        let pipeline = context.new_pipeline(
            &[BufferLayout::default()],
            &shader::attributes(),
            shader,
            PipelineParams::default(),
        );

        let canvas = Bitmap::filled(width, height, colors::BLACK);
        let texture = Self::create_texture(context, &canvas);
        Ok(Screen {
            canvas,
            background: colors::BLACK,
            pipeline,
            vertex_buffer,
            index_buffer,
            texture,
            texture_size: (width, height),
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }
    pub fn set_size(&mut self, width: u32, height: u32) {
        if self.size() != (width, height) {
            log::debug!("screen resized to {width}x{height}");
            self.canvas = Bitmap::filled(width, height, self.background);
        }
    }
    pub fn set_background(&mut self, color: LinSrgba) {
        self.background = color;
    }

    /// Clears the canvas to the background colour and hands it out for
    /// compositing.
    pub fn begin_frame(&mut self) -> &mut Bitmap {
        self.canvas.fill(self.background);
        &mut self.canvas
    }

    pub fn present(&mut self, context: &mut RenderingContext) {
        if self.texture_size != self.size() {
            context.delete_texture(self.texture);
            self.texture = Self::create_texture(context, &self.canvas);
            self.texture_size = self.size();
        } else {
            context.texture_update(self.texture, &Self::upload_bytes(&self.canvas));
        }

        context.begin_default_pass(Default::default());
        context.apply_pipeline(&self.pipeline);
        context.apply_bindings(&Bindings {
            vertex_buffers: vec![self.vertex_buffer],
            index_buffer: self.index_buffer,
            images: vec![self.texture],
        });
        context.draw(0, 6, 1);
        context.end_render_pass();
    }
}
