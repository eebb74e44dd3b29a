use log::warn;

use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    A,
    B,
}

/// One endpoint of one surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EndpointHandle {
    pub surface: SurfaceId,
    pub endpoint: Endpoint,
}

impl EndpointHandle {
    #[inline]
    pub fn position<'a>(&self, surfaces: &'a Surfaces) -> Result<&'a Vector> {
        let s = surfaces.get(self.surface)?;
        Ok(match self.endpoint {
            Endpoint::A => s.a(),
            Endpoint::B => s.b(),
        })
    }
}

/// Drags surface endpoints around with a pointer.
///
/// Meant to be updated once per frame, between propagation passes.
#[derive(Clone, Debug, PartialEq)]
pub struct Editor {
    pick_radius: Float,
    selection: Option<EndpointHandle>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PICK_RADIUS)
    }
}

impl Editor {
    pub const DEFAULT_PICK_RADIUS: Float = 10.0;

    #[inline]
    #[must_use]
    pub fn new(pick_radius: Float) -> Self {
        Self {
            pick_radius,
            selection: None,
        }
    }

    #[inline]
    pub const fn selection(&self) -> Option<EndpointHandle> {
        self.selection
    }

    /// The first endpoint, in registry order (`a` before `b`), strictly closer
    /// than the pick radius to `pointer`.
    pub fn pick(&self, surfaces: &Surfaces, pointer: &Vector) -> Option<EndpointHandle> {
        surfaces.iter().find_map(|(surface, s)| {
            [(Endpoint::A, s.a()), (Endpoint::B, s.b())]
                .into_iter()
                .find(|(_, p)| (*p - pointer).norm() < self.pick_radius)
                .map(|(endpoint, _)| EndpointHandle { surface, endpoint })
        })
    }

    /// While the pointer is released, (re)selects the endpoint under it, if any.
    /// While it is pressed, moves the selected endpoint to it.
    ///
    /// Returns whether a surface was moved.
    pub fn update(&mut self, surfaces: &mut Surfaces, pointer: impl Into<Vector>, pressed: bool) -> Result<bool> {
        let pointer = pointer.into();

        if !pressed {
            self.selection = self.pick(surfaces, &pointer);
            return Ok(false);
        }

        let Some(handle) = self.selection else {
            return Ok(false);
        };

        let surface = surfaces.get_mut(handle.surface)?;

        let moved = match handle.endpoint {
            Endpoint::A => surface.set_a(pointer),
            Endpoint::B => surface.set_b(pointer),
        };

        match moved {
            Ok(()) => Ok(true),
            Err(Error::DegenerateSurface) => {
                warn!("ignoring move collapsing surface {}", handle.surface);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
