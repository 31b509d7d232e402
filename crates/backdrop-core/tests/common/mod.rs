// Deterministic host doubles shared by the integration tests.

#![allow(dead_code)]

use backdrop_core::error::DrawError;
use backdrop_core::lifecycle::{FrameHandle, HostScheduler, ObserverHandle, TimerHandle};
use backdrop_core::scene::{SceneBackend, SceneGraph, SceneObjects, SceneResource};
use backdrop_core::scroll::ScrollLayout;
use backdrop_core::style::{ElementId, StyleSink};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub root: Vec<(String, String)>,
    pub elements: Vec<(ElementId, String, String)>,
}

impl RecordingSink {
    pub fn root_writes(&self, name: &str) -> Vec<&str> {
        self.root
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn element_writes(&self, id: ElementId, name: &str) -> Vec<&str> {
        self.elements
            .iter()
            .filter(|(e, n, _)| *e == id && n == name)
            .map(|(_, _, v)| v.as_str())
            .collect()
    }

    pub fn last_element(&self, id: ElementId, name: &str) -> Option<&str> {
        self.element_writes(id, name).last().copied()
    }
}

impl StyleSink for RecordingSink {
    fn set_root_var(&mut self, name: &str, value: &str) {
        self.root.push((name.to_string(), value.to_string()));
    }

    fn set_element_var(&mut self, element: ElementId, name: &str, value: &str) {
        self.elements
            .push((element, name.to_string(), value.to_string()));
    }
}

#[derive(Debug, Default)]
pub struct CountingHost {
    pub cancelled_frames: Vec<FrameHandle>,
    pub cleared_timers: Vec<TimerHandle>,
    pub disconnected: Vec<ObserverHandle>,
}

impl HostScheduler for CountingHost {
    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancelled_frames.push(handle);
    }

    fn clear_timer(&mut self, handle: TimerHandle) {
        self.cleared_timers.push(handle);
    }

    fn disconnect(&mut self, handle: ObserverHandle) {
        self.disconnected.push(handle);
    }
}

/// What the backend saw. Shared so tests can inspect it after the scene moved
/// into a lifecycle owner.
#[derive(Debug, Default)]
pub struct BackendLog {
    pub draws: u32,
    pub resizes: Vec<(u32, u32)>,
    pub released: Vec<SceneResource>,
    pub last_opacities: Vec<f32>,
}

#[derive(Clone, Default)]
pub struct CountingBackend {
    pub log: Rc<RefCell<BackendLog>>,
    pub fail_with: Option<DrawError>,
}

impl SceneBackend for CountingBackend {
    fn draw(&mut self, scene: &SceneObjects) -> Result<(), DrawError> {
        let mut log = self.log.borrow_mut();
        log.draws += 1;
        log.last_opacities = scene.solids.iter().map(|s| s.material.opacity).collect();
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().resizes.push((width, height));
    }

    fn release(&mut self, resource: SceneResource) {
        self.log.borrow_mut().released.push(resource);
    }
}

#[derive(Debug, Default)]
pub struct LayoutCounter {
    pub refreshes: u32,
}

impl ScrollLayout for LayoutCounter {
    fn refresh(&mut self) {
        self.refreshes += 1;
    }
}

pub fn scene(width: u32, height: u32) -> (SceneGraph<CountingBackend>, Rc<RefCell<BackendLog>>) {
    let backend = CountingBackend::default();
    let log = backend.log.clone();
    let objects = SceneObjects::new(width, height, 7);
    (SceneGraph::assemble(objects, backend), log)
}

/// Hands out increasing frame handles.
#[derive(Debug, Default)]
pub struct FrameIds {
    next: i32,
}

impl FrameIds {
    pub fn next(&mut self) -> Option<FrameHandle> {
        self.next += 1;
        Some(FrameHandle(self.next))
    }
}
