use std::collections::HashMap;

use log::debug;

use super::prelude::Value;

pub type Scope = HashMap<String, Value>;

/// Scopes of one function invocation, innermost last.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Frame {
    layers: Vec<Scope>,
}

impl Frame {
    pub fn new(scope: Scope) -> Self {
        Self { layers: vec![scope] }
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Environment {
    pub global: Scope,
    /// Catch layers opened while no function is running.
    top_layers: Vec<Scope>,
    frames: Vec<Frame>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            global: HashMap::new(),
            top_layers: vec![],
            frames: vec![],
        }
    }

    fn layers(&self) -> &[Scope] {
        match self.frames.last() {
            Some(frame) => &frame.layers,
            None => &self.top_layers
        }
    }

    fn layers_mut(&mut self) -> &mut Vec<Scope> {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.layers,
            None => &mut self.top_layers
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.layers()
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .or_else(|| self.global.get(name))
    }

    /// Binds `name` in the innermost scope of the current frame.
    pub fn define(&mut self, name: String, value: Value) {
        match self.layers_mut().last_mut() {
            Some(scope) => {
                scope.insert(name, value);
            },
            None => {
                self.global.insert(name, value);
            }
        }
    }

    /// Overwrites the most local existing binding, or defines `name` locally.
    pub fn set(&mut self, name: String, value: Value) {
        let existing = self.layers_mut()
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(&name));

        if let Some(slot) = existing {
            *slot = value;
            return;
        }

        if let Some(slot) = self.global.get_mut(&name) {
            *slot = value;
            return;
        }

        self.define(name, value)
    }

    pub fn push_frame(&mut self, scope: Scope) {
        self.frames.push(Frame::new(scope));

        debug!(target: "obscurix::eval", "push frame, depth {}", self.depth());
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();

        debug!(target: "obscurix::eval", "pop frame, depth {}", self.depth());
    }

    pub fn push_layer(&mut self) {
        self.layers_mut().push(HashMap::new());
    }

    pub fn pop_layer(&mut self) {
        self.layers_mut().pop();
    }

    /// Number of active function frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
