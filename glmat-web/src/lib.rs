/// glmat Web - per-frame matrices for a WebGL page
///
/// The page owns the context, shaders and buffers. This crate keeps the
/// scene parameters, computes the combined matrix each animation frame and
/// hands it to `uniformMatrix4fv`.
use glmat_core::{
    Mesh, OrbitCamera, ProjectionMode, RotationOrder, Scene, Scene2DParams, SceneParams,
};
use tracing::debug;
use wasm_bindgen::prelude::*;
use web_sys::{WebGlRenderingContext, WebGlUniformLocation};

fn to_js(err: glmat_core::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Scene state driven from JavaScript (sliders, `requestAnimationFrame`)
#[wasm_bindgen]
pub struct WebScene {
    scene: Scene,
}

#[wasm_bindgen]
impl WebScene {
    /// Start from the F demo's defaults
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebScene {
        WebScene {
            scene: Scene::new(SceneParams::default()),
        }
    }

    /// Replace the parameters with `text` (parameter-file syntax) applied
    /// over the defaults
    pub fn load_params(&mut self, text: &str) -> Result<(), JsValue> {
        self.scene.params = text.parse::<SceneParams>().map_err(to_js)?;
        debug!("scene parameters replaced from page");
        Ok(())
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        let p = &mut self.scene.params;
        (p.x, p.y, p.z) = (x, y, z);
    }

    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) {
        let p = &mut self.scene.params;
        (p.angle_x, p.angle_y, p.angle_z) = (x, y, z);
    }

    pub fn set_scale(&mut self, x: f32, y: f32, z: f32) {
        let p = &mut self.scene.params;
        (p.scale_x, p.scale_y, p.scale_z) = (x, y, z);
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.scene.params.lens.fov = fov;
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        let lens = &mut self.scene.params.lens;
        lens.near = near;
        lens.far = far;
    }

    pub fn set_animate(&mut self, animate: bool) {
        self.scene.params.animate = animate;
    }

    pub fn set_camera(&mut self, angle: f32, radius: f32) {
        self.scene.params.camera = Some(OrbitCamera::new(angle, radius));
    }

    pub fn clear_camera(&mut self) {
        self.scene.params.camera = None;
    }

    pub fn set_rotation_order(&mut self, order: &str) -> Result<(), JsValue> {
        self.scene.params.rotation_order = match order {
            "xyz" => RotationOrder::Xyz,
            "zyx" => RotationOrder::Zyx,
            other => return Err(JsValue::from_str(&format!("unknown rotation order `{other}`"))),
        };
        Ok(())
    }

    pub fn set_orthographic(&mut self, orthographic: bool) {
        let mode = if orthographic {
            ProjectionMode::Orthographic
        } else {
            ProjectionMode::Perspective
        };
        self.scene.params.set_projection_mode(mode);
    }

    /// Current Y angle, for sliders that follow the animation
    pub fn angle_y(&self) -> f32 {
        self.scene.params.angle_y
    }

    pub fn fps(&self) -> f32 {
        self.scene.fps()
    }

    /// Advance to the `requestAnimationFrame` timestamp
    pub fn tick(&mut self, timestamp: f64) -> f32 {
        self.scene.tick(timestamp)
    }

    /// Row-major `model × view × projection` (16 floats)
    pub fn frame_matrix(&self, aspect: f32) -> Result<Vec<f32>, JsValue> {
        let matrix = self.scene.frame_matrix(aspect).map_err(to_js)?;
        Ok(matrix.to_array().to_vec())
    }

    /// Compute the frame matrix and upload it to `location`
    pub fn upload(
        &self,
        gl: &WebGlRenderingContext,
        location: &WebGlUniformLocation,
        aspect: f32,
    ) -> Result<(), JsValue> {
        let matrix = self.scene.frame_matrix(aspect).map_err(to_js)?;
        gl.uniform_matrix4fv_with_f32_array(Some(location), false, matrix.as_slice());
        Ok(())
    }
}

impl Default for WebScene {
    fn default() -> Self {
        Self::new()
    }
}

/// 3x3 matrix for the 2D demos (9 floats, row-major)
#[wasm_bindgen]
pub fn frame_matrix_2d(
    x: f32,
    y: f32,
    angle: f32,
    scale_x: f32,
    scale_y: f32,
    width: f32,
    height: f32,
) -> Result<Vec<f32>, JsValue> {
    let params = Scene2DParams {
        x,
        y,
        angle,
        scale_x,
        scale_y,
    };
    let matrix = params.frame_matrix(width, height).map_err(to_js)?;
    Ok(matrix.to_array().to_vec())
}

/// Vertex positions of the F for a `FLOAT` attribute buffer
#[wasm_bindgen]
pub fn letter_f_positions() -> Vec<f32> {
    Mesh::letter_f().positions()
}

/// Per-vertex colours of the F for a normalised `UNSIGNED_BYTE` buffer
#[wasm_bindgen]
pub fn letter_f_colors() -> Vec<u8> {
    Mesh::letter_f().colors()
}
