//! Constant folding.

use crate::{Channel, Node, Signal};

impl Channel {
    /// Folds every constant-only subtree into a single Constant leaf.
    ///
    /// Operands are reduced first. A node whose operands all reduced to
    /// constants is evaluated once at `t = 0` and replaced by the result.
    /// Nothing else is rewritten: subtrees that depend on time keep their
    /// structure, and a node whose operands came back untouched is returned
    /// as the very same shared node.
    ///
    /// If the one-off evaluation fails (say `log(-1)`), the node is kept as
    /// is and the error will surface when the channel is evaluated.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthexpr::{Channel, add, mul};
    ///
    /// let folded = add(Channel::identity(), mul(2.0, 3.0)).reduce();
    /// assert_eq!(folded.to_string(), "sum(t, 6)");
    /// ```
    pub fn reduce(&self) -> Channel {
        match self.node() {
            Node::Constant(_) | Node::Identity | Node::Sampled(_) | Node::Oscillator(_) => {
                self.clone()
            }
            Node::Invert(a) => self.fold([a], |[a]| Node::Invert(a)),
            Node::Abs(a) => self.fold([a], |[a]| Node::Abs(a)),
            Node::Log(a) => self.fold([a], |[a]| Node::Log(a)),
            Node::Sum(a, b) => self.fold([a, b], |[a, b]| Node::Sum(a, b)),
            Node::Difference(a, b) => self.fold([a, b], |[a, b]| Node::Difference(a, b)),
            Node::Product(a, b) => self.fold([a, b], |[a, b]| Node::Product(a, b)),
            Node::Quotient(a, b) => self.fold([a, b], |[a, b]| Node::Quotient(a, b)),
            Node::Power(a, b) => self.fold([a, b], |[a, b]| Node::Power(a, b)),
            Node::PassThrough { outer, inner } => {
                self.fold([outer, inner], |[outer, inner]| Node::PassThrough { outer, inner })
            }
            Node::Transform { inner, config } => {
                let config = *config;
                self.fold([inner], move |[inner]| Node::Transform { inner, config })
            }
        }
    }

    fn fold<const N: usize>(
        &self,
        operands: [&Channel; N],
        rebuild: impl FnOnce([Channel; N]) -> Node,
    ) -> Channel {
        let reduced = operands.map(Channel::reduce);
        let foldable = reduced.iter().all(Channel::is_constant);
        let unchanged = operands
            .iter()
            .zip(&reduced)
            .all(|(before, after)| before.ptr_eq(after));

        let node = if unchanged {
            self.clone()
        } else {
            Channel::from_node(rebuild(reduced))
        };
        if !foldable {
            return node;
        }
        // Constant subtrees are time-invariant, so any t would do
        match node.eval(0.0) {
            Ok(value) => Channel::constant(value),
            Err(err) => {
                log::trace!("leaving {node} unfolded: {err}");
                node
            }
        }
    }
}
