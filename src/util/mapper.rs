use crate::frontend::ast::{CaseBranch, Class, Expression, Feature, Program};

/// converts an ast with one kind of expression metadata into an ast with another
pub trait AstMapper<FromMeta, ToMeta> {
    fn map_expression(&mut self, expr: &Expression<FromMeta>) -> Expression<ToMeta>;
    fn map_case_branch(&mut self, branch: &CaseBranch<FromMeta>) -> CaseBranch<ToMeta>;
    fn map_feature(&mut self, feature: &Feature<FromMeta>) -> Feature<ToMeta>;
    fn map_class(&mut self, class: &Class<FromMeta>) -> Class<ToMeta>;

    /// main ast mapper function, default implementation maps classes in order
    fn map_classes<'c, I>(&mut self, classes: I) -> Program<ToMeta>
        where I: IntoIterator<Item=&'c Class<FromMeta>>, FromMeta: 'c {
        let mapped_classes: Vec<_> = classes.into_iter()
            .map(|class| self.map_class(class))
            .collect();
        Program::new(mapped_classes)
    }
}
