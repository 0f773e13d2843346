use crate::types::Type;

/// 循环依赖检测栈
///
/// 每次顶层解析创建一个新栈，通过 `&mut` 在递归中传递，
/// 不同线程上的并发解析互不影响。
#[derive(Debug, Default)]
pub struct ResolutionStack {
    frames: Vec<Type>,
}

impl ResolutionStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, ty: &Type) -> bool {
        self.frames.iter().any(|frame| frame == ty)
    }

    pub fn push(&mut self, ty: Type) {
        self.frames.push(ty);
    }

    pub fn pop(&mut self) -> Option<Type> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// 当前解析链，用于日志
    pub fn chain(&self) -> String {
        self.frames
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_and_chain() {
        let a = Type::interface("tests", "IA").build();
        let b = Type::interface("tests", "IB").build();
        let mut stack = ResolutionStack::new();

        stack.push(a.clone());
        stack.push(b.clone());
        assert!(stack.contains(&a));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.chain(), "tests::IA -> tests::IB");

        assert_eq!(stack.pop(), Some(b.clone()));
        assert!(!stack.contains(&b));
    }
}
