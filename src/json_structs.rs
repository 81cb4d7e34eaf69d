/*

    Declare data structs needed to parse JSON. 

    - SingleOrVec: a JSON field holding either one object
      or an array of objects

    @date: 13 Oct, 2025
*/

use serde::Deserialize;


// To handle JSON file having a single <object>
// or an array of <object>s 
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum SingleOrVec<T> {
    Empty,
    Single(T),
    Multiple(Vec<T>),
}

impl<T> SingleOrVec<T>  {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            SingleOrVec::Empty => [].iter(),
            SingleOrVec::Single(t) => std::slice::from_ref(t).iter(),
            SingleOrVec::Multiple(vec) => vec.iter(),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            SingleOrVec::Empty => vec![],
            SingleOrVec::Single(t) => vec![t],
            SingleOrVec::Multiple(vec) => vec,
        }
    }

    pub fn len(&self) -> usize {
        self.iter().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for SingleOrVec<T> {
    fn default() -> Self {
        SingleOrVec::Empty
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Clone, PartialEq)]
    struct Named {
        #[serde(rename = "_name")]
        name: String,
    }

    #[test]
    fn test_single_or_vec() {
        let single: SingleOrVec<Named> = serde_json::from_str(r#"{"_name": "a"}"#).unwrap();
        assert_eq!(single.len(), 1);

        let many: SingleOrVec<Named> = serde_json::from_str(r#"[{"_name": "a"}, {"_name": "b"}]"#).unwrap();
        let names: Vec<_> = many.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        let empty: SingleOrVec<Named> = SingleOrVec::default();
        assert!(empty.is_empty());
        assert!(empty.into_vec().is_empty());
    }
}
