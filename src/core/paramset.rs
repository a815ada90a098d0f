//! Bundle up parameters and their values in a generic way.
//!
//! Accelerators, the camera and the ray caster read their settings
//! from a **ParamSet** by name, falling back to a default when a
//! parameter was never given.

// rs_bsp
use crate::core::base::Float;

#[derive(Debug, Clone)]
pub struct ParamSetItem<T> {
    pub name: String,
    pub values: Vec<T>,
    pub n_values: usize,
}

impl<T> ParamSetItem<T> {
    fn single(name: String, value: T) -> Self {
        ParamSetItem {
            name,
            values: vec![value],
            n_values: 1_usize,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ParamSet {
    pub ints: Vec<ParamSetItem<i32>>,
    pub floats: Vec<ParamSetItem<Float>>,
    pub strings: Vec<ParamSetItem<String>>,
}

impl ParamSet {
    pub fn add_int(&mut self, name: String, value: i32) {
        self.erase(&name);
        self.ints.push(ParamSetItem::single(name, value));
    }
    pub fn add_float(&mut self, name: String, value: Float) {
        self.erase(&name);
        self.floats.push(ParamSetItem::single(name, value));
    }
    pub fn add_floats(&mut self, name: String, values: Vec<Float>) {
        self.erase(&name);
        let n_values: usize = values.len();
        self.floats.push(ParamSetItem::<Float> {
            name,
            values,
            n_values,
        });
    }
    pub fn add_string(&mut self, name: String, value: String) {
        self.erase(&name);
        self.strings.push(ParamSetItem::single(name, value));
    }
    /// Later additions replace earlier ones with the same name.
    fn erase(&mut self, name: &str) {
        self.ints.retain(|v| v.name != name);
        self.floats.retain(|v| v.name != name);
        self.strings.retain(|v| v.name != name);
    }
    pub fn find_one_int(&self, name: &str, d: i32) -> i32 {
        for v in &self.ints {
            if v.name == name && v.n_values == 1 {
                return v.values[0];
            }
        }
        d
    }
    pub fn find_one_float(&self, name: &str, d: Float) -> Float {
        for v in &self.floats {
            if v.name == name && v.n_values == 1 {
                return v.values[0];
            }
        }
        d
    }
    pub fn find_float(&self, name: &str) -> Vec<Float> {
        for v in &self.floats {
            if v.name == name {
                return v.values.clone();
            }
        }
        Vec::new()
    }
    pub fn find_one_string(&self, name: &str, d: String) -> String {
        for v in &self.strings {
            if v.name == name && v.n_values == 1 {
                return v.values[0].clone();
            }
        }
        d
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_when_missing() {
        let ps = ParamSet::default();
        assert_eq!(ps.find_one_int("maxprims", 4), 4);
        assert_eq!(ps.find_one_float("focal", 1.0), 1.0);
        assert_eq!(ps.find_one_string("mode", String::from("normal")), "normal");
        assert!(ps.find_float("eye").is_empty());
    }

    #[test]
    fn last_addition_wins() {
        let mut ps = ParamSet::default();
        ps.add_int(String::from("maxdepth"), 8);
        ps.add_int(String::from("maxdepth"), 12);
        ps.add_floats(String::from("eye"), vec![0.0, 1.0, 2.0]);
        ps.add_string(String::from("mode"), String::from("depth"));
        assert_eq!(ps.find_one_int("maxdepth", 20), 12);
        assert_eq!(ps.ints.len(), 1);
        assert_eq!(ps.find_float("eye"), vec![0.0, 1.0, 2.0]);
        // arrays are not single values
        assert_eq!(ps.find_one_float("eye", -1.0), -1.0);
        assert_eq!(ps.find_one_string("mode", String::new()), "depth");
    }
}
