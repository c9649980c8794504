/// A uniform value passed to a program.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Uniform {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
}

/// Named uniform values, kept in insertion order.
///
/// Setting a name twice overwrites the earlier value in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Uniforms {
    values: Vec<(String, Uniform)>,
}

impl Uniforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Uniform>) -> Self {
        self.set(name, value);
        self
    }

    pub fn float(self, name: impl Into<String>, value: f32) -> Self {
        self.with(name, Uniform::Float(value))
    }

    pub fn vec2(self, name: impl Into<String>, value: [f32; 2]) -> Self {
        self.with(name, Uniform::Vec2(value))
    }

    pub fn vec3(self, name: impl Into<String>, value: [f32; 3]) -> Self {
        self.with(name, Uniform::Vec3(value))
    }

    pub fn vec4(self, name: impl Into<String>, value: [f32; 4]) -> Self {
        self.with(name, Uniform::Vec4(value))
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Uniform>) -> &mut Self {
        let name = name.into();
        let value = value.into();

        match self.values.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name, value)),
        }

        self
    }

    pub fn get(&self, name: &str) -> Option<Uniform> {
        self.values.iter().find(|(key, _)| key == name).map(|(_, value)| *value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Uniform)> + '_ {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<f32> for Uniform {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<[f32; 2]> for Uniform {
    fn from(value: [f32; 2]) -> Self {
        Self::Vec2(value)
    }
}

impl From<[f32; 3]> for Uniform {
    fn from(value: [f32; 3]) -> Self {
        Self::Vec3(value)
    }
}

impl From<[f32; 4]> for Uniform {
    fn from(value: [f32; 4]) -> Self {
        Self::Vec4(value)
    }
}

impl<K: Into<String>, V: Into<Uniform>> FromIterator<(K, V)> for Uniforms {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut uniforms = Self::new();
        for (name, value) in iter {
            uniforms.set(name, value);
        }
        uniforms
    }
}
