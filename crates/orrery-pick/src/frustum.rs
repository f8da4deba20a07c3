// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use orrery_math::{p3, Mat4, MathError, Vec4};

/// What the frustum clamp needs to know about a view.
pub trait FrustumView {
    /// `true` for perspective projections.
    fn is_perspective(&self) -> bool;
    /// Camera-to-world matrix.
    fn camera_to_world(&self) -> Mat4;
    /// World-to-normalized-device matrix.
    fn world_to_ndc(&self) -> Result<Mat4, MathError>;
}

/// Camera with an OpenGL-style projection looking down its local `-z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Placement of the camera in the world.
    pub camera_to_world: Mat4,
    /// Perspective (`true`) or orthographic projection.
    pub perspective: bool,
    /// Vertical field of view in radians; for orthographic cameras, the
    /// view height at unit distance.
    pub fov_y: f64,
    /// Width over height.
    pub aspect: f64,
    /// Near plane distance.
    pub near: f64,
    /// Far plane distance.
    pub far: f64,
}

impl Camera {
    /// Perspective camera at the world origin.
    pub fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64) -> Self {
        Self { camera_to_world: Mat4::identity(), perspective: true, fov_y, aspect, near, far }
    }

    /// Orthographic camera at the world origin showing `height` world units vertically.
    pub fn orthographic(height: f64, aspect: f64, near: f64, far: f64) -> Self {
        Self { camera_to_world: Mat4::identity(), perspective: false, fov_y: height, aspect, near, far }
    }

    /// Moves the camera.
    pub fn with_camera_to_world(mut self, camera_to_world: Mat4) -> Self {
        self.camera_to_world = camera_to_world;
        self
    }

    /// Camera-to-NDC matrix.
    pub fn projection(&self) -> Mat4 {
        if self.perspective {
            Mat4::perspective(self.fov_y, self.aspect, self.near, self.far)
        } else {
            let top = self.fov_y / 2.0;
            let right = top * self.aspect;
            Mat4::orthographic(-right, right, -top, top, self.near, self.far)
        }
    }
}

impl FrustumView for Camera {
    fn is_perspective(&self) -> bool {
        self.perspective
    }

    fn camera_to_world(&self) -> Mat4 {
        self.camera_to_world
    }

    fn world_to_ndc(&self) -> Result<Mat4, MathError> {
        Ok(self.projection() * self.camera_to_world.inverse()?)
    }
}

/// Extends `to` so that `from → to` ends on the far clipping plane.
///
/// `from` is expected on the near plane (NDC depth `-1`), which is where
/// device-to-world pick rays start.
/// Orthographic views are left alone, as is a ray with no depth extent in
/// device space. If the eye would end up in front of `from`, `to` is negated
/// so that the ray still points away from the eye.
pub fn get_frustum_interval(from: &Vec4, to: &mut Vec4, view: &impl FrustumView) -> Result<(), MathError> {
    if !view.is_perspective() {
        return Ok(());
    }
    let eye = view.camera_to_world().transform(&Vec4::ORIGIN);
    let world_to_ndc = view.world_to_ndc()?;
    let ndc_to_world = world_to_ndc.inverse()?;

    let from_ndc = world_to_ndc.transform(from).dehomogenize();
    let to_ndc = world_to_ndc.transform(to).dehomogenize();
    let along = to_ndc.sub(&from_ndc);
    let depth = along.component(2);
    if depth == 0.0 {
        return Ok(());
    }
    let far_ndc = Vec4::linear_combination(depth, &from_ndc, 2.0, &along);
    *to = ndc_to_world.transform(&far_ndc).dehomogenize();

    let [a, b] = p3::barycentric_coordinates(from, to, &eye);
    if a * b > 0.0 {
        *to = to.scale(-1.0);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use orrery_math::deg_to_rad;

    use super::*;

    #[test]
    fn perspective_ray_is_extended_to_the_far_plane() {
        let camera = Camera::perspective(deg_to_rad(60.0), 1.0, 0.5, 100.0);
        let from = Vec4::point(0.0, 0.0, -0.5);
        let mut to = Vec4::point(0.0, 0.0, -5.0);
        get_frustum_interval(&from, &mut to, &camera).unwrap();
        let [x, y, z, w] = to.to_array();
        assert!(x.abs() < 1e-9 && y.abs() < 1e-9);
        assert!((z + 100.0).abs() < 1e-6, "z = {z}");
        assert_eq!(w, 1.0);
    }

    #[test]
    fn orthographic_view_is_untouched() {
        let camera = Camera::orthographic(2.0, 1.0, 0.5, 100.0);
        let from = Vec4::point(0.0, 0.0, -0.5);
        let mut to = Vec4::point(0.3, 0.0, -5.0);
        get_frustum_interval(&from, &mut to, &camera).unwrap();
        assert_eq!(to, Vec4::point(0.3, 0.0, -5.0));
    }

    #[test]
    fn singular_camera_placement_is_an_error() {
        let camera = Camera::perspective(1.0, 1.0, 0.5, 100.0).with_camera_to_world(Mat4::scale(1.0, 0.0, 1.0));
        let mut to = Vec4::ORIGIN;
        assert!(get_frustum_interval(&Vec4::ORIGIN, &mut to, &camera).is_err());
    }
}
