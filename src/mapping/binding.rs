use super::action::Action;
use crate::controller::InputId;
use crate::persistence::MappingStore;
use std::collections::HashMap;
use tracing::debug;

static UNBOUND: Action = Action::Unbound;

/// Input -> compiled action, rebuilt from the store whenever a binding changes
#[derive(Clone, Debug, Default)]
pub struct BindingTable {
    actions: HashMap<InputId, Action>,
}

impl BindingTable {
    pub fn compile(store: &MappingStore) -> Self {
        let actions = InputId::ALL
            .into_iter()
            .map(|input| {
                let action = Action::parse(store.binding_for(input).unwrap_or(""));
                if let Action::Unknown(name) = &action {
                    debug!("Input {} bound to unknown action '{}'", input, name);
                }
                (input, action)
            })
            .collect();
        Self { actions }
    }

    pub fn action(&self, input: InputId) -> &Action {
        self.actions.get(&input).unwrap_or(&UNBOUND)
    }

    /// Bindings in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = (InputId, &Action)> {
        InputId::ALL
            .into_iter()
            .map(move |input| (input, self.action(input)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{KeyId, PointerButton};

    #[test]
    fn compiles_defaults() {
        let table = BindingTable::compile(&MappingStore::defaults());
        assert_eq!(
            table.action(InputId::ButtonA),
            &Action::Pointer(PointerButton::Left)
        );
        assert_eq!(table.action(InputId::ButtonBack), &Action::KeyTap(KeyId::Escape));
        assert_eq!(table.action(InputId::ButtonStart), &Action::Exit);
    }

    #[test]
    fn missing_empty_and_unknown_bindings() {
        let store = MappingStore::parse("button_a =\nbutton_b = fly\n");
        let table = BindingTable::compile(&store);
        assert_eq!(table.action(InputId::ButtonA), &Action::Unbound);
        assert_eq!(
            table.action(InputId::ButtonB),
            &Action::Unknown("fly".to_string())
        );
        assert_eq!(BindingTable::default().action(InputId::DPadUp), &Action::Unbound);
    }
}
