use crate::ImageFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::VariantArray)]
pub enum SlotRole {
    Model,
    Garment,
}
impl SlotRole {
    pub fn id(&self) -> &'static str {
        match self {
            SlotRole::Model => "model-uploader",
            SlotRole::Garment => "dress-uploader",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SlotRole::Model => "Model Image",
            SlotRole::Garment => "Dress Image",
        }
    }

    pub fn call_to_action(&self) -> &'static str {
        match self {
            SlotRole::Model => "Upload Photo of Person",
            SlotRole::Garment => "Upload Photo of Dress",
        }
    }
}

/// A selected image and its session-local preview.
///
/// The preview is owned by the slot and released when the slot is dropped,
/// which happens on replacement or teardown.
#[derive(Debug)]
pub struct Slot<P> {
    file: ImageFile,
    preview: P,
}
impl<P> Slot<P> {
    pub fn new(file: ImageFile, preview: P) -> Self {
        Self { file, preview }
    }

    pub fn file(&self) -> &ImageFile {
        &self.file
    }

    pub fn preview(&self) -> &P {
        &self.preview
    }
}

#[derive(Debug)]
pub struct Slots<P> {
    model: Option<Slot<P>>,
    garment: Option<Slot<P>>,
}
impl<P> Default for Slots<P> {
    fn default() -> Self {
        Self {
            model: None,
            garment: None,
        }
    }
}
impl<P> Slots<P> {
    pub fn get(&self, role: SlotRole) -> Option<&Slot<P>> {
        match role {
            SlotRole::Model => self.model.as_ref(),
            SlotRole::Garment => self.garment.as_ref(),
        }
    }

    /// Last write wins. Returns the replaced slot, if any, so the caller
    /// decides when its preview is released.
    #[must_use]
    pub fn set(&mut self, role: SlotRole, slot: Slot<P>) -> Option<Slot<P>> {
        let target = match role {
            SlotRole::Model => &mut self.model,
            SlotRole::Garment => &mut self.garment,
        };
        target.replace(slot)
    }

    pub fn is_filled(&self, role: SlotRole) -> bool {
        self.get(role).is_some()
    }

    /// `(model, garment)` when both are selected.
    pub fn both(&self) -> Option<(&ImageFile, &ImageFile)> {
        match (&self.model, &self.garment) {
            (Some(model), Some(garment)) => Some((&model.file, &garment.file)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Tracked(Rc<Cell<usize>>);
    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn file(name: &str) -> ImageFile {
        ImageFile::new(name, vec![0u8; 4]).unwrap()
    }

    #[test]
    fn replacing_releases_previous_preview() {
        let released = Rc::new(Cell::new(0));
        let mut slots = Slots::default();

        let old = slots.set(
            SlotRole::Model,
            Slot::new(file("a.png"), Tracked(released.clone())),
        );
        assert!(old.is_none());
        let old = slots.set(
            SlotRole::Model,
            Slot::new(file("b.png"), Tracked(released.clone())),
        );
        assert_eq!(old.as_ref().map(|x| x.file().name()), Some("a.png"));
        drop(old);
        assert_eq!(released.get(), 1);
        assert_eq!(slots.get(SlotRole::Model).unwrap().file().name(), "b.png");

        drop(slots);
        assert_eq!(released.get(), 2);
    }

    #[test]
    fn both_requires_two_files() {
        let mut slots = Slots::default();
        assert!(slots.both().is_none());
        let _ = slots.set(SlotRole::Garment, Slot::new(file("dress.jpg"), ()));
        assert!(slots.both().is_none());
        assert!(!slots.is_filled(SlotRole::Model));
        let _ = slots.set(SlotRole::Model, Slot::new(file("model.jpg"), ()));
        let (model, garment) = slots.both().unwrap();
        assert_eq!(model.name(), "model.jpg");
        assert_eq!(garment.name(), "dress.jpg");
    }
}
