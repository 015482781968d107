use std::collections::BTreeMap;

use galaxy_common::CloudId;
use galaxy_gen::PointCloud;

use crate::vertex::{PointVertex, interleave};

/// How uploaded points are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMaterial {
    /// Point size in world units.
    pub size: f32,
    /// Shrink points with distance from the camera.
    pub size_attenuation: bool,
    /// Write to the depth buffer. Off so overlapping points blend.
    pub depth_write: bool,
    /// Add colors instead of alpha-blending them.
    pub additive_blending: bool,
}

impl Default for PointMaterial {
    fn default() -> Self {
        Self {
            size: 0.01,
            size_attenuation: true,
            depth_write: false,
            additive_blending: true,
        }
    }
}

impl PointMaterial {
    pub fn with_size(size: f32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }
}

/// GPU-side owner of uploaded point buffers.
pub trait CloudBackend {
    /// Backend-specific resource handle for one uploaded cloud.
    type Handle;
    type Error: std::error::Error;

    fn upload(
        &mut self,
        id: CloudId,
        cloud: &PointCloud,
        material: &PointMaterial,
    ) -> Result<Self::Handle, Self::Error>;

    fn release(&mut self, handle: Self::Handle);
}

/// Holds the one cloud currently on screen and guarantees its release.
///
/// [`replace`](Self::replace) uploads the new cloud first and only then
/// releases the previous one, so a failed upload leaves the old cloud in
/// place. Whatever is held when the slot is dropped is released.
pub struct CloudSlot<B: CloudBackend> {
    backend: B,
    current: Option<(CloudId, B::Handle)>,
}

impl<B: CloudBackend> CloudSlot<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: None,
        }
    }

    /// Upload `cloud` and make it current, releasing the previous cloud.
    pub fn replace(
        &mut self,
        cloud: &PointCloud,
        material: &PointMaterial,
    ) -> Result<CloudId, B::Error> {
        let id = CloudId::new();
        let handle = self.backend.upload(id, cloud, material)?;
        tracing::debug!(cloud = %id.short(), points = cloud.len(), "cloud uploaded");
        if let Some(previous) = self.current.replace((id, handle)) {
            self.release(previous);
        }
        Ok(id)
    }

    /// Release the current cloud, if any.
    pub fn clear(&mut self) {
        if let Some(previous) = self.current.take() {
            self.release(previous);
        }
    }

    pub fn current_id(&self) -> Option<CloudId> {
        self.current.as_ref().map(|(id, _)| *id)
    }

    pub fn current_handle(&self) -> Option<&B::Handle> {
        self.current.as_ref().map(|(_, h)| h)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn release(&mut self, (id, handle): (CloudId, B::Handle)) {
        tracing::debug!(cloud = %id.short(), "cloud released");
        self.backend.release(handle);
    }
}

impl<B: CloudBackend> Drop for CloudSlot<B> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Errors from the in-memory backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("upload of {requested} bytes exceeds budget ({in_use} of {budget} bytes in use)")]
    OutOfMemory {
        requested: usize,
        in_use: usize,
        budget: usize,
    },
}

/// CPU-memory stand-in for a GPU: keeps interleaved vertex buffers keyed by
/// cloud id and tracks allocation totals.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    buffers: BTreeMap<CloudId, (Vec<PointVertex>, PointMaterial)>,
    budget: Option<usize>,
    uploads: usize,
    releases: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that refuses uploads once `budget` bytes would be live.
    pub fn with_budget(budget: usize) -> Self {
        Self {
            budget: Some(budget),
            ..Self::default()
        }
    }

    /// Number of clouds currently allocated.
    pub fn live(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_bytes(&self) -> usize {
        self.buffers
            .values()
            .map(|(v, _)| v.len() * PointVertex::STRIDE)
            .sum()
    }

    pub fn uploads(&self) -> usize {
        self.uploads
    }

    pub fn releases(&self) -> usize {
        self.releases
    }

    pub fn vertices(&self, id: CloudId) -> Option<&[PointVertex]> {
        self.buffers.get(&id).map(|(v, _)| v.as_slice())
    }

    pub fn material(&self, id: CloudId) -> Option<&PointMaterial> {
        self.buffers.get(&id).map(|(_, m)| m)
    }
}

impl CloudBackend for MemoryBackend {
    type Handle = CloudId;
    type Error = BackendError;

    fn upload(
        &mut self,
        id: CloudId,
        cloud: &PointCloud,
        material: &PointMaterial,
    ) -> Result<CloudId, BackendError> {
        let requested = cloud.len() * PointVertex::STRIDE;
        if let Some(budget) = self.budget {
            let in_use = self.live_bytes();
            if in_use + requested > budget {
                return Err(BackendError::OutOfMemory {
                    requested,
                    in_use,
                    budget,
                });
            }
        }
        self.buffers.insert(id, (interleave(cloud), *material));
        self.uploads += 1;
        Ok(id)
    }

    fn release(&mut self, handle: CloudId) {
        if self.buffers.remove(&handle).is_some() {
            self.releases += 1;
        }
    }
}

/// Lets a slot borrow a backend the caller keeps inspecting.
impl<B: CloudBackend + ?Sized> CloudBackend for &mut B {
    type Handle = B::Handle;
    type Error = B::Error;

    fn upload(
        &mut self,
        id: CloudId,
        cloud: &PointCloud,
        material: &PointMaterial,
    ) -> Result<Self::Handle, Self::Error> {
        (**self).upload(id, cloud, material)
    }

    fn release(&mut self, handle: Self::Handle) {
        (**self).release(handle)
    }
}
