/// Supplies a presentation-ready label for listings or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}
