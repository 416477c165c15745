use std::collections::HashMap;

use super::{DatasetBase, Label, Labels, Records};
use ndarray::{ArrayBase, Data, Ix1};

impl<L: Label, S: Data<Elem = L>> Labels for ArrayBase<S, Ix1> {
    type Elem = L;

    fn label_count(&self) -> HashMap<L, usize> {
        let mut map = HashMap::new();

        for val in self.iter() {
            *map.entry(val.clone()).or_insert(0) += 1;
        }

        map
    }
}

impl<L: Label> Labels for Vec<L> {
    type Elem = L;

    fn label_count(&self) -> HashMap<L, usize> {
        let mut map = HashMap::new();

        for val in self.iter() {
            *map.entry(val.clone()).or_insert(0) += 1;
        }

        map
    }
}

impl<R: Records, T: Labels> Labels for DatasetBase<R, T> {
    type Elem = T::Elem;

    fn label_count(&self) -> HashMap<T::Elem, usize> {
        self.targets.label_count()
    }
}
