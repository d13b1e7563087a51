use std::ops::Deref;

use internment::LocalIntern;

/// An interned identifier, e.g. the parameter name on the left of an assignment.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ident(pub(crate) LocalIntern<Vec<u8>>);

impl Deref for Ident {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl Ident {
    pub fn new_from_slice(data: &[u8]) -> Self {
        Self(LocalIntern::new(data.to_vec()))
    }
}

impl std::fmt::Debug for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Ident")
            .field(&String::from_utf8_lossy(&*self.0))
            .finish()
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&*self.0))
    }
}

impl From<&str> for Ident {
    fn from(s: &str) -> Self {
        Self::new_from_slice(s.as_bytes())
    }
}
